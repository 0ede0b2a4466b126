//! 产业分类与评语对照表
//!
//! 裸代码 → 产业标签、产业标签 → 多空评语，均为静态参考数据

/// 未收录代码归入的预设产业
pub const DEFAULT_SECTOR: &str = "一般產業";

/// 常见台股代码对应产业
///
/// 覆盖自选清单高频标的即可，查不到时落到预设产业
const SECTOR_BY_CODE: &[(&str, &str)] = &[
    // 半导体
    ("2330", "半導體"),
    ("2303", "半導體"),
    ("2454", "半導體"),
    ("3711", "半導體"),
    ("3034", "半導體"),
    ("3008", "半導體"),
    // AI 概念 / 电子代工
    ("2317", "AI 概念"),
    ("2382", "AI 概念"),
    ("3231", "AI 概念"),
    ("2356", "AI 概念"),
    ("4938", "AI 概念"),
    ("2357", "AI 概念"),
    // 航运
    ("2603", "航運股"),
    ("2609", "航運股"),
    ("2615", "航運股"),
    ("2618", "航運股"),
    // 金融
    ("2881", "金融股"),
    ("2882", "金融股"),
    ("2891", "金融股"),
    ("2886", "金融股"),
    // 生技医疗
    ("6505", "生技醫療"),
    ("1795", "生技醫療"),
    ("4743", "生技醫療"),
    // 重电绿能
    ("1513", "重電綠能"),
    ("1519", "重電綠能"),
    ("6806", "重電綠能"),
];

/// 各产业的（看多评语, 看空评语）
const COMMENTARY_BY_SECTOR: &[(&str, (&str, &str))] = &[
    (
        "半導體",
        (
            "半導體族群受惠 AI 伺服器與先進製程需求，動能延續",
            "半導體庫存調整壓力仍在，短線追價宜保守",
        ),
    ),
    (
        "AI 概念",
        (
            "AI 概念股出貨動能強勁，市場資金持續靠攏",
            "AI 題材波動劇烈，漲多拉回風險升高",
        ),
    ),
    (
        "航運股",
        (
            "航運運價指數回升，族群營收展望轉佳",
            "航運景氣循環向下，運價走弱壓抑獲利",
        ),
    ),
    (
        "金融股",
        (
            "金融股受惠利差環境與股利題材，防禦性佳",
            "金融股面臨利率反轉與資產品質疑慮",
        ),
    ),
    (
        "生技醫療",
        (
            "生技醫療題材發酵，新藥與代工訂單帶動買盤",
            "生技醫療評價偏高，題材退潮時修正較深",
        ),
    ),
    (
        "重電綠能",
        (
            "重電綠能受惠電網更新與綠電政策，訂單能見度高",
            "重電綠能漲幅已大，留意政策與交期變數",
        ),
    ),
];

/// 预设产业的（看多, 看空）评语
const DEFAULT_COMMENTARY: (&str, &str) = (
    "所屬族群買盤回流，可留意後續量能變化",
    "所屬族群買氣觀望，建議等待趨勢明朗",
);

/// 查询裸代码所属产业，未收录时返回预设产业
pub fn sector_of(code: &str) -> &'static str {
    SECTOR_BY_CODE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
        .unwrap_or(DEFAULT_SECTOR)
}

/// 查询产业的（看多, 看空）评语，未收录时返回预设评语
pub fn commentary(sector: &str) -> (&'static str, &'static str) {
    COMMENTARY_BY_SECTOR
        .iter()
        .find(|(s, _)| *s == sector)
        .map(|(_, pair)| *pair)
        .unwrap_or(DEFAULT_COMMENTARY)
}
