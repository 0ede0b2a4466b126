//! 历史行情快取
//!
//! 以（排序后的代码集合 + 回看区间）为键，缓存整批抓取结果，
//! 存放 (值, 抓取时间)，是否过期由调用方按自己的 TTL 判定

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::services::quote::{HistoryOutcome, Lookback};

/// 快取键：请求参数的精确组合
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// 排序去重后的完整代码列表
    symbols: Vec<String>,
    lookback: Lookback,
}

impl CacheKey {
    fn new(symbols: &[String], lookback: Lookback) -> Self {
        let mut symbols: Vec<String> = symbols.to_vec();
        symbols.sort();
        symbols.dedup();
        Self { symbols, lookback }
    }
}

/// 历史行情快取
///
/// 只在单一请求周期内被一个逻辑执行者访问，无需内部加锁
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: HashMap<CacheKey, (Instant, HashMap<String, HistoryOutcome>)>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询未超过 max_age 的缓存结果
    ///
    /// 键必须与请求参数完全一致，部分重叠的代码集合不命中
    pub fn lookup(
        &self,
        symbols: &[String],
        lookback: Lookback,
        max_age: Duration,
    ) -> Option<HashMap<String, HistoryOutcome>> {
        let key = CacheKey::new(symbols, lookback);
        self.entries.get(&key).and_then(|(fetched_at, outcomes)| {
            if fetched_at.elapsed() < max_age {
                Some(outcomes.clone())
            } else {
                None
            }
        })
    }

    /// 写入一批抓取结果，记录抓取时间
    pub fn put(
        &mut self,
        symbols: &[String],
        lookback: Lookback,
        outcomes: HashMap<String, HistoryOutcome>,
    ) {
        let key = CacheKey::new(symbols, lookback);
        self.entries.insert(key, (Instant::now(), outcomes));
    }
}
