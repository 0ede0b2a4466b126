//! 评级引擎
//!
//! 依据最新价与 20/60 日均线的相对位置给出评级。
//! 判定规则是一张按顺序求值的规则表（先匹配者生效），
//! 条件之间有重叠，顺序即优先级

use serde::{Deserialize, Serialize};

use crate::services::sector;

/// 强力买进的乖离率门槛（百分比）
const STRONG_BUY_BIAS_PCT: f64 = 5.0;

/// 评级标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingLabel {
    /// 强力买进：站上双均线且乖离明显
    StrongBuy,
    /// 买进：站上 20 日线且乖离为正
    Buy,
    /// 短多：上市日浅但已站上 20 日线
    ShortTermBull,
    /// 观察：趋势不明
    Neutral,
    /// 卖出：跌破 20 日线
    Sell,
    /// 回避：双均线同时跌破
    Avoid,
    /// 无资料：取不到现价
    NoData,
}

impl RatingLabel {
    /// 前端显示文字
    pub fn display(&self) -> &'static str {
        match self {
            RatingLabel::StrongBuy => "🔥 強力買進",
            RatingLabel::Buy => "💰 買進",
            RatingLabel::ShortTermBull => "📈 短多",
            RatingLabel::Neutral => "👀 觀察",
            RatingLabel::Sell => "⚠️ 賣出",
            RatingLabel::Avoid => "❌ 回避",
            RatingLabel::NoData => "❓ 無資料",
        }
    }

    /// 前端样式类名
    pub fn style_class(&self) -> &'static str {
        match self {
            RatingLabel::StrongBuy => "rating-strong-buy",
            RatingLabel::Buy => "rating-buy",
            RatingLabel::ShortTermBull => "rating-short-bull",
            RatingLabel::Neutral => "rating-neutral",
            RatingLabel::Sell => "rating-sell",
            RatingLabel::Avoid => "rating-avoid",
            RatingLabel::NoData => "rating-no-data",
        }
    }

    /// 排序优先级（与分数独立，置顶/同分判定用），越大越前
    pub fn priority(&self) -> u8 {
        match self {
            RatingLabel::StrongBuy => 5,
            RatingLabel::Buy => 4,
            RatingLabel::ShortTermBull => 3,
            RatingLabel::Neutral => 3,
            RatingLabel::Sell => 2,
            RatingLabel::Avoid => 1,
            RatingLabel::NoData => 0,
        }
    }
}

/// 评级结果
///
/// 每个抓取周期由最新价格序列重新计算，不单独保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// 评级标签
    pub label: RatingLabel,
    /// 排序优先级
    pub priority: u8,
    /// 信心分数（0~100）
    pub score: u8,
    /// 评级理由（技术面描述 + 产业评语）
    pub rationale: String,
}

/// 规则求值的输入快照
#[derive(Debug, Clone, Copy)]
struct RuleInput {
    price: f64,
    ma20: Option<f64>,
    ma60: Option<f64>,
}

impl RuleInput {
    /// 相对 20 日线的乖离率（百分比）
    fn bias20(&self) -> Option<f64> {
        self.ma20
            .filter(|ma| *ma != 0.0)
            .map(|ma| (self.price - ma) / ma * 100.0)
    }
}

/// 单条评级规则：命中条件 + 产出
///
/// matches 为真即采用该条的 label/score，后续规则不再求值
struct Rule {
    label: RatingLabel,
    score: u8,
    matches: fn(&RuleInput) -> bool,
    technical: fn(&RuleInput) -> String,
}

/// 规则表，自上而下求值，顺序即优先级
///
/// 前两条处理 60 日线资料不足的年轻序列，其余要求双均线齐备；
/// 末条观察是兜底，保证任何输入都有评级
const RULES: &[Rule] = &[
    Rule {
        label: RatingLabel::ShortTermBull,
        score: 60,
        matches: |i| i.ma60.is_none() && i.ma20.map(|ma| i.price > ma).unwrap_or(false),
        technical: |i| {
            format!(
                "上市日淺（60 日均線資料不足），但股價 {:.2} 已站上 20 日均線 {:.2}",
                i.price,
                i.ma20.unwrap_or(0.0)
            )
        },
    },
    Rule {
        label: RatingLabel::Neutral,
        score: 40,
        matches: |i| i.ma60.is_none(),
        technical: |i| format!("上市日淺，均線資料不足，股價 {:.2} 暫列觀察", i.price),
    },
    Rule {
        label: RatingLabel::StrongBuy,
        score: 90,
        matches: |i| {
            let above_both =
                i.ma20.map(|ma| i.price > ma).unwrap_or(false) && i.ma60.map(|ma| i.price > ma).unwrap_or(false);
            above_both && i.bias20().map(|b| b > STRONG_BUY_BIAS_PCT).unwrap_or(false)
        },
        technical: |i| {
            format!(
                "股價 {:.2} 站上 20 日均線 {:.2} 與 60 日均線 {:.2}，乖離率 +{:.2}%",
                i.price,
                i.ma20.unwrap_or(0.0),
                i.ma60.unwrap_or(0.0),
                i.bias20().unwrap_or(0.0)
            )
        },
    },
    Rule {
        label: RatingLabel::Buy,
        score: 70,
        matches: |i| {
            i.ma20.map(|ma| i.price > ma).unwrap_or(false)
                && i.bias20().map(|b| b > 0.0).unwrap_or(false)
        },
        technical: |i| {
            format!(
                "股價 {:.2} 站上 20 日均線 {:.2}，乖離率 +{:.2}%",
                i.price,
                i.ma20.unwrap_or(0.0),
                i.bias20().unwrap_or(0.0)
            )
        },
    },
    Rule {
        label: RatingLabel::Avoid,
        score: 10,
        matches: |i| {
            i.ma20.map(|ma| i.price < ma).unwrap_or(false)
                && i.ma60.map(|ma| i.price < ma).unwrap_or(false)
        },
        technical: |i| {
            format!(
                "股價 {:.2} 同時跌破 20 日均線 {:.2} 與 60 日均線 {:.2}",
                i.price,
                i.ma20.unwrap_or(0.0),
                i.ma60.unwrap_or(0.0)
            )
        },
    },
    Rule {
        label: RatingLabel::Sell,
        score: 30,
        matches: |i| i.ma20.map(|ma| i.price < ma).unwrap_or(false),
        technical: |i| {
            format!(
                "股價 {:.2} 跌破 20 日均線 {:.2}，但仍守住 60 日均線",
                i.price,
                i.ma20.unwrap_or(0.0)
            )
        },
    },
    // 兜底：价格夹在均线之间或恰好等于均线
    Rule {
        label: RatingLabel::Neutral,
        score: 50,
        matches: |_| true,
        technical: |i| {
            format!(
                "股價 {:.2} 於 20 日均線 {:.2} 附近整理，方向未明",
                i.price,
                i.ma20.unwrap_or(0.0)
            )
        },
    },
];

/// 对一档标的给出评级
///
/// 任何输入组合都会落在某条规则上，绝不报错；
/// current_price 缺失或非正常值时直接给无资料评级
pub fn classify(
    current_price: Option<f64>,
    ma20: Option<f64>,
    ma60: Option<f64>,
    sector_tag: &str,
) -> Classification {
    let price = match current_price {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => {
            return Classification {
                label: RatingLabel::NoData,
                priority: RatingLabel::NoData.priority(),
                score: 0,
                rationale: "無法取得現價資料".to_string(),
            }
        }
    };

    let input = RuleInput { price, ma20, ma60 };

    // 末条规则恒真，find 必定命中
    let rule = RULES
        .iter()
        .find(|r| (r.matches)(&input))
        .unwrap_or(&RULES[RULES.len() - 1]);

    let (bull, bear) = sector::commentary(sector_tag);
    let sector_clause = match rule.label {
        RatingLabel::StrongBuy | RatingLabel::Buy | RatingLabel::ShortTermBull => bull,
        RatingLabel::Sell | RatingLabel::Avoid => bear,
        _ => bull,
    };

    Classification {
        label: rule.label,
        priority: rule.label.priority(),
        score: rule.score,
        rationale: format!("{}。{}", (rule.technical)(&input), sector_clause),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_of(price: Option<f64>, ma20: Option<f64>, ma60: Option<f64>) -> RatingLabel {
        classify(price, ma20, ma60, "半導體").label
    }

    #[test]
    fn test_no_data_when_price_missing() {
        let c = classify(None, Some(100.0), Some(100.0), "半導體");
        assert_eq!(c.label, RatingLabel::NoData);
        assert_eq!(c.score, 0);
        assert_eq!(c.priority, 0);
    }

    #[test]
    fn test_no_data_when_price_unusable() {
        assert_eq!(label_of(Some(f64::NAN), None, None), RatingLabel::NoData);
        assert_eq!(label_of(Some(0.0), None, None), RatingLabel::NoData);
        assert_eq!(label_of(Some(-1.0), None, None), RatingLabel::NoData);
    }

    /// 年轻序列：无 60 日线时只分短多/观察两种
    #[test]
    fn test_young_series_branches() {
        assert_eq!(label_of(Some(105.0), Some(100.0), None), RatingLabel::ShortTermBull);
        assert_eq!(label_of(Some(95.0), Some(100.0), None), RatingLabel::Neutral);
        // 连 20 日线都没有
        assert_eq!(label_of(Some(100.0), None, None), RatingLabel::Neutral);
    }

    #[test]
    fn test_strong_buy_requires_bias_over_threshold() {
        // 站上双均线且乖离 > 5%
        assert_eq!(label_of(Some(106.0), Some(100.0), Some(98.0)), RatingLabel::StrongBuy);
        // 站上双均线但乖离不足 5% → 买进
        assert_eq!(label_of(Some(103.0), Some(100.0), Some(98.0)), RatingLabel::Buy);
    }

    #[test]
    fn test_sell_and_avoid() {
        // 双均线齐破 → 回避
        assert_eq!(label_of(Some(90.0), Some(100.0), Some(95.0)), RatingLabel::Avoid);
        // 破 20 日线但守住 60 日线 → 卖出
        assert_eq!(label_of(Some(96.0), Some(100.0), Some(95.0)), RatingLabel::Sell);
    }

    #[test]
    fn test_neutral_between_averages() {
        // 价格恰好等于 20 日线，既不站上也未跌破
        assert_eq!(label_of(Some(100.0), Some(100.0), Some(100.0)), RatingLabel::Neutral);
    }

    /// 分数单调：强力买进 > 买进 > 观察 > 卖出 > 回避
    #[test]
    fn test_score_monotonicity() {
        println!("\n========== 测试评级分数单调性 ==========");
        let strong = classify(Some(106.0), Some(100.0), Some(98.0), "半導體").score;
        let buy = classify(Some(103.0), Some(100.0), Some(98.0), "半導體").score;
        let neutral = classify(Some(100.0), Some(100.0), Some(100.0), "半導體").score;
        let sell = classify(Some(96.0), Some(100.0), Some(95.0), "半導體").score;
        let avoid = classify(Some(90.0), Some(100.0), Some(95.0), "半導體").score;

        println!("  强力买进 {} > 买进 {} > 观察 {} > 卖出 {} > 回避 {}",
            strong, buy, neutral, sell, avoid);
        assert_eq!((strong, buy, neutral, sell, avoid), (90, 70, 50, 30, 10));
        assert!(strong > buy && buy > neutral && neutral > sell && sell > avoid);
        println!("✅ 分数单调性测试通过！");
    }

    /// 全组合遍历：任何输入都要给出评级，绝不 panic
    #[test]
    fn test_totality() {
        println!("\n========== 测试评级全覆盖 ==========");
        let prices = [None, Some(f64::NAN), Some(0.0), Some(90.0), Some(100.0), Some(110.0)];
        let mas = [None, Some(95.0), Some(100.0), Some(105.0)];

        let mut count = 0;
        for price in prices {
            for ma20 in mas {
                for ma60 in mas {
                    let c = classify(price, ma20, ma60, "不存在的產業");
                    assert!(c.score <= 100);
                    assert!(!c.rationale.is_empty());
                    count += 1;
                }
            }
        }
        println!("  共遍历 {} 种输入组合", count);
        println!("✅ 评级全覆盖测试通过！");
    }

    /// 看多评级带看多评语，看空评级带看空评语
    #[test]
    fn test_rationale_sector_clause() {
        let bull = classify(Some(106.0), Some(100.0), Some(98.0), "航運股");
        assert!(bull.rationale.contains("航運"));

        let bear = classify(Some(90.0), Some(100.0), Some(95.0), "航運股");
        assert!(bear.rationale.contains("航運"));
        assert_ne!(bull.rationale, bear.rationale);
    }

    /// 不足 20 笔的序列必走年轻序列分支，不碰乖离门槛分支
    #[test]
    fn test_young_series_scenario() {
        let series = [100.0, 102.0, 101.0, 99.0, 103.0];
        let ma20 = crate::services::series::moving_average(&series, 20);
        let ma60 = crate::services::series::moving_average(&series, 60);
        assert!(ma20.is_none() && ma60.is_none());

        let c = classify(series.last().copied(), ma20, ma60, "半導體");
        assert_eq!(c.label, RatingLabel::Neutral);
        assert_eq!(c.score, 40);
    }
}
