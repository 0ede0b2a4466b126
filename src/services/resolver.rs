//! 代码解析器
//!
//! 把用户输入（代号或名称）解析为带市场后缀的规范化标的。
//! 分层尝试，先命中者生效：
//! 1. 本地名称字典精确匹配
//! 2. 纯数字代号 → 上市/上柜双分段行情验证
//! 3. 远程符号搜索
//! 4. 本地字典模糊（子串）匹配兜底
//!
//! 解析器只负责解析，不写入自选清单

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

use crate::models::{InstrumentId, MarketSegment};
use crate::services::quote::{HistoryOutcome, Lookback, QuoteSource, SearchHit};

/// 认可的海外交易所代码（美股主要板块）
const FOREIGN_EXCHANGES: &[&str] = &["NYQ", "NMS", "NGM", "ASE", "PCX"];

/// 解析失败原因
///
/// 逐一区分以便前端给出针对性提示
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// 数字后紧跟字母等畸形输入，直接拒绝不发起查询
    #[error("輸入格式有誤，請輸入股票代號或公司名稱")]
    Malformed,
    /// 纯数字但位数不足
    #[error("代號太短，台股代號至少 3 位數")]
    TooShort,
    /// 上市/上柜都验证不到行情
    #[error("查無此代號，上市與上櫃市場都找不到")]
    NotFound,
    /// 所有层都没有命中
    #[error("查無相符的股票，請換個關鍵字試試")]
    NoMatch,
}

/// 代码解析器
///
/// 持有本地名称字典（名称 → 裸代码），行情源由调用方注入
pub struct TickerResolver {
    dict: BTreeMap<String, String>,
}

impl TickerResolver {
    pub fn new(dict: BTreeMap<String, String>) -> Self {
        Self { dict }
    }

    /// 内建常见台股名称字典
    pub fn with_default_dict() -> Self {
        let pairs = [
            ("台積電", "2330"),
            ("聯電", "2303"),
            ("聯發科", "2454"),
            ("鴻海", "2317"),
            ("廣達", "2382"),
            ("緯創", "3231"),
            ("英業達", "2356"),
            ("華碩", "2357"),
            ("和碩", "4938"),
            ("台達電", "2308"),
            ("大立光", "3008"),
            ("日月光投控", "3711"),
            ("長榮", "2603"),
            ("長榮航", "2618"),
            ("陽明", "2609"),
            ("萬海", "2615"),
            ("中鋼", "2002"),
            ("富邦金", "2881"),
            ("國泰金", "2882"),
            ("玉山金", "2884"),
        ];
        let dict = pairs
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect();
        Self::new(dict)
    }

    /// 解析用户输入
    ///
    /// 远程层（行情验证、符号搜索）超时或网络错误时静默落到下一层，
    /// 绝不向上抛传输错误
    pub async fn resolve(
        &self,
        user_text: &str,
        source: &dyn QuoteSource,
    ) -> Result<(InstrumentId, String), ResolveError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ResolveError::Malformed);
        }

        // 预检：数字后紧跟字母的畸形输入不发起任何查询
        let malformed = Regex::new(r"^\d+[A-Za-z]").unwrap();
        if malformed.is_match(text) {
            return Err(ResolveError::Malformed);
        }

        // 第一层：本地字典精确匹配
        if let Some(code) = self.dict.get(text) {
            return Ok((InstrumentId::twse(code.clone()), text.to_string()));
        }

        // 第二层：纯数字代号走双分段行情验证
        if text.chars().all(|c| c.is_ascii_digit()) {
            return self.resolve_numeric(text, source).await;
        }

        // 第三层：远程符号搜索
        match source.search(text).await {
            Ok(hits) => {
                for hit in &hits {
                    if let Some(resolved) = map_search_hit(hit) {
                        return Ok(resolved);
                    }
                }
            }
            Err(e) => {
                log::warn!("符号搜索失败，落到本地模糊匹配: {}", e);
            }
        }

        // 第四层：本地字典子串匹配兜底
        for (name, code) in &self.dict {
            if name.contains(text) || text.contains(name.as_str()) {
                return Ok((InstrumentId::twse(code.clone()), name.clone()));
            }
        }

        Err(ResolveError::NoMatch)
    }

    /// 纯数字代号：先试上市（.TW），无行情再试上柜（.TWO）
    ///
    /// 两个分段都确认无行情 → 查无此代号，绝不盲目接受；
    /// 任一分段是传输失败则不下定论，落到远程搜索层
    async fn resolve_numeric(
        &self,
        code: &str,
        source: &dyn QuoteSource,
    ) -> Result<(InstrumentId, String), ResolveError> {
        if code.len() < 3 {
            return Err(ResolveError::TooShort);
        }

        let mut confirmed_empty = 0;

        for segment in [MarketSegment::Twse, MarketSegment::Tpex] {
            let id = InstrumentId::new(code, segment);
            let symbol = id.symbol();
            let mut outcomes = source
                .history(&[symbol.clone()], Lookback::ThreeMonths)
                .await;

            match outcomes.remove(&symbol) {
                Some(HistoryOutcome::Data(_)) => {
                    return Ok((id, self.display_name(code)));
                }
                Some(HistoryOutcome::Empty) | None => confirmed_empty += 1,
                Some(HistoryOutcome::Failed(reason)) => {
                    log::warn!("验证 {} 失败: {}", symbol, reason);
                }
            }
        }

        if confirmed_empty == 2 {
            return Err(ResolveError::NotFound);
        }

        // 传输失败导致验证不完整，交给远程搜索再试一次
        match source.search(code).await {
            Ok(hits) => {
                for hit in &hits {
                    if let Some(resolved) = map_search_hit(hit) {
                        return Ok(resolved);
                    }
                }
                Err(ResolveError::NotFound)
            }
            Err(_) => Err(ResolveError::NotFound),
        }
    }

    /// 数字代号的显示名称：字典反查，查不到就用裸代码
    fn display_name(&self, code: &str) -> String {
        self.dict
            .iter()
            .find(|(_, c)| c.as_str() == code)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| code.to_string())
    }
}

/// 把搜索命中映射为标的标识
///
/// 台股分段映射为带后缀的代码，认可的海外交易所保留原始代码，
/// 其余交易所一律跳过
fn map_search_hit(hit: &SearchHit) -> Option<(InstrumentId, String)> {
    let bare = InstrumentId::from_symbol(&hit.symbol).code;
    let id = match hit.exchange.as_str() {
        "TAI" => InstrumentId::twse(bare),
        "TWO" => InstrumentId::tpex(bare),
        ex if FOREIGN_EXCHANGES.contains(&ex) => InstrumentId::foreign(hit.symbol.clone()),
        _ => return None,
    };
    Some((id, hit.name.clone()))
}
