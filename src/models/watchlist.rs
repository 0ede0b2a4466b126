//! 自选清单数据模型
//!
//! 定义前端表格消费的行数据结构

use serde::{Deserialize, Serialize};

/// 表格行数据
///
/// 每个渲染周期从最新价格序列重新组装，不做持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    /// 完整代码（含市场后缀）
    pub code: String,
    /// 显示名称
    pub name: String,
    /// 外部行情页链接
    pub reference_url: String,
    /// 最新收盘价
    pub price: f64,
    /// 涨跌幅（百分比）
    pub change_pct: f64,
    /// 20 日均线显示值（资料不足时为 "N/A"）
    pub ma20_display: String,
    /// 评级标签
    pub rating_label: String,
    /// 评级样式类名（供前端着色）
    pub rating_style_class: String,
    /// 评级理由（HTML 片段，悬浮显示）
    pub rationale_html: String,
    /// 近期收盘价切片（≤30 点，供走势迷你图）
    pub trend_slice: Vec<f64>,
}

/// 自选清单组装结果
///
/// rows 已排序（置顶标的在前，其余按分数降序）；
/// pruned 为本轮因取不到行情而被自动移除的条目数
#[derive(Debug, Serialize, Deserialize)]
pub struct WatchlistView {
    /// 表格行
    pub rows: Vec<DisplayRow>,
    /// 本轮自动移除的条目数（非致命提示）
    pub pruned: usize,
    /// 当前清单条目总数
    pub total: usize,
    /// 列表提示信息
    pub notice: String,
}

/// 加入自选请求
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    /// 用户输入（代码或名称）
    pub query: String,
}

/// 清单查询参数
#[derive(Debug, Deserialize)]
pub struct WatchlistQuery {
    /// 只看强力买进
    pub strong_only: Option<bool>,
}
