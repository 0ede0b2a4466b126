//! 自选清单存储
//!
//! 会话内的可变清单，按加入顺序保存，以完整代码去重。
//! 由外部构造后注入各组件，不做全局单例，测试与多会话可各持一份

use crate::models::{InstrumentId, WatchlistEntry};

/// 加入操作的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// 新加入
    Added,
    /// 已在清单中（视为正常情况回报，不是错误）
    AlreadyPresent,
}

/// 自选清单
#[derive(Debug, Default)]
pub struct WatchlistStore {
    entries: Vec<WatchlistEntry>,
    /// 最近一次成功加入的标的，下一轮组装时置顶（用后即清）
    last_added: Option<InstrumentId>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置几档热门标的的清单
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for (code, name) in [("2330", "台積電"), ("2317", "鴻海"), ("2603", "長榮")] {
            store.add(WatchlistEntry::new(InstrumentId::twse(code), name));
        }
        // 预置标的不参与置顶
        store.last_added = None;
        store
    }

    /// 加入条目，完整代码为去重键
    ///
    /// 重复加入是无操作，回报已存在；成功加入的标的记录为置顶候选
    pub fn add(&mut self, entry: WatchlistEntry) -> AddOutcome {
        if self.contains(&entry.id) {
            return AddOutcome::AlreadyPresent;
        }
        self.last_added = Some(entry.id.clone());
        self.entries.push(entry);
        AddOutcome::Added
    }

    pub fn contains(&self, id: &InstrumentId) -> bool {
        self.entries.iter().any(|e| e.id == *id)
    }

    /// 按完整代码移除，返回是否确有移除
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id.symbol() != symbol);
        if self
            .last_added
            .as_ref()
            .map(|id| id.symbol() == symbol)
            .unwrap_or(false)
        {
            self.last_added = None;
        }
        self.entries.len() < before
    }

    /// 当前全部条目（按加入顺序）
    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 取走置顶候选（取后即清，置顶只作用一轮）
    pub fn take_last_added(&mut self) -> Option<InstrumentId> {
        self.last_added.take()
    }
}
