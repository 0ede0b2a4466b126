//! 价格序列工具
//!
//! 提供移动均线与涨跌幅计算，输入为按时间升序排列的收盘价序列
//! （最新一笔在末尾），纯函数无副作用

/// 计算最近一期涨跌幅（百分比）
///
/// (最新收盘 - 前一收盘) / 前一收盘 * 100；
/// 序列不足两笔时视为无前值，返回 0 而不报错
pub fn change_pct(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let last = series[series.len() - 1];
    let prev = series[series.len() - 2];
    if prev == 0.0 {
        return 0.0;
    }
    (last - prev) / prev * 100.0
}

/// 计算尾部 window 笔的简单移动平均
///
/// 序列长度不足 window 时返回 None，不做外插也不补零
pub fn moving_average(series: &[f64], window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }
    let tail = &series[series.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
