//! 行情数据源模块
//!
//! 定义行情抓取的统一接口，当前实现对接 Yahoo Finance

pub mod yahoo;

pub use yahoo::YahooClient;

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 回看区间（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookback {
    /// 近三个月
    ThreeMonths,
    /// 近六个月
    SixMonths,
    /// 近一年
    OneYear,
}

impl Lookback {
    /// 数据源的 range 参数
    pub fn range_param(&self) -> &'static str {
        match self {
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
        }
    }

    /// 从 range 参数还原，不认识的值返回 None
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "3mo" => Some(Lookback::ThreeMonths),
            "6mo" => Some(Lookback::SixMonths),
            "1y" => Some(Lookback::OneYear),
            _ => None,
        }
    }
}

/// 单一标的的历史抓取结果
///
/// 三态显式区分：有数据 / 确认无数据 / 传输失败，
/// 调用方必须逐一匹配处理，不允许静默吞错
#[derive(Debug, Clone)]
pub enum HistoryOutcome {
    /// 按时间升序的收盘价序列（非空）
    Data(Vec<f64>),
    /// 数据源确认查无此标的（代码无效或已下市）
    Empty,
    /// 网络或解析层面的失败
    Failed(String),
}

/// 符号搜索命中
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// 数据源返回的完整代码
    pub symbol: String,
    /// 显示名称
    pub name: String,
    /// 交易所代码（如 TAI / TWO / NMS）
    pub exchange: String,
}

/// 行情数据源接口
///
/// history 为合并抓取：一次调用覆盖全部标的，单一标的失败
/// 只影响自身的结果项，不中断其他标的
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 抓取一批标的的日收盘序列
    async fn history(
        &self,
        symbols: &[String],
        lookback: Lookback,
    ) -> HashMap<String, HistoryOutcome>;

    /// 自由文字搜索代码或名称
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;
}
