//! 标的标识模型
//!
//! 定义市场分段与规范化标的代码

use serde::{Deserialize, Serialize};
use std::fmt;

/// 市场分段
///
/// 台股标的分为上市（TWSE，后缀 .TW）与上柜（TPEx，后缀 .TWO），
/// 海外标的不带后缀，直接使用数据源返回的原始代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSegment {
    /// 台湾证券交易所（上市）
    Twse,
    /// 证券柜台买卖中心（上柜）
    Tpex,
    /// 海外市场（美股等）
    Foreign,
}

impl MarketSegment {
    /// 该分段对应的代码后缀
    pub fn suffix(&self) -> &'static str {
        match self {
            MarketSegment::Twse => ".TW",
            MarketSegment::Tpex => ".TWO",
            MarketSegment::Foreign => "",
        }
    }
}

/// 规范化标的标识
///
/// 由裸代码和市场分段组成，全系统统一使用带后缀的完整代码作为键，
/// 裸代码本身永远不直接入库
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentId {
    /// 裸代码（如 "2330"）
    pub code: String,
    /// 市场分段
    pub segment: MarketSegment,
}

impl InstrumentId {
    pub fn new(code: impl Into<String>, segment: MarketSegment) -> Self {
        Self {
            code: code.into(),
            segment,
        }
    }

    /// 上市标的（.TW）
    pub fn twse(code: impl Into<String>) -> Self {
        Self::new(code, MarketSegment::Twse)
    }

    /// 上柜标的（.TWO）
    pub fn tpex(code: impl Into<String>) -> Self {
        Self::new(code, MarketSegment::Tpex)
    }

    /// 海外标的（无后缀）
    pub fn foreign(symbol: impl Into<String>) -> Self {
        Self::new(symbol, MarketSegment::Foreign)
    }

    /// 完整代码，如 "2330.TW"、"8069.TWO"、"AAPL"
    pub fn symbol(&self) -> String {
        format!("{}{}", self.code, self.segment.suffix())
    }

    /// 从完整代码解析，按后缀还原市场分段
    pub fn from_symbol(symbol: &str) -> Self {
        if let Some(code) = symbol.strip_suffix(".TWO") {
            Self::tpex(code)
        } else if let Some(code) = symbol.strip_suffix(".TW") {
            Self::twse(code)
        } else {
            Self::foreign(symbol)
        }
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

/// 自选清单条目
///
/// 由代码解析器在解析成功后创建，之后不做原地修改（替换而非编辑）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    /// 标的标识
    pub id: InstrumentId,
    /// 显示名称
    pub name: String,
}

impl WatchlistEntry {
    pub fn new(id: InstrumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
