//! Yahoo Finance 行情接口实现
//!
//! 历史行情对接 v8 chart 接口，符号搜索对接 v1 search 接口，
//! 台股代码带 .TW / .TWO 后缀直接查询

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use url::Url;

use super::{HistoryOutcome, Lookback, QuoteSource, SearchHit};
use crate::config::QuoteConfig;

// Yahoo Finance API 常量
const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
const YAHOO_SEARCH_API: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const TW_QUOTE_PAGE: &str = "https://tw.stock.yahoo.com/quote/";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo 行情客户端
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new(config: &QuoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// 标的在 Yahoo 奇摩股市的行情页链接
    pub fn reference_url(symbol: &str) -> String {
        format!("{}{}", TW_QUOTE_PAGE, symbol)
    }

    /// 抓取单一标的的日线收盘序列
    ///
    /// 404 视为查无此标的（Empty），其余错误归入 Failed
    async fn fetch_one(&self, symbol: &str, lookback: Lookback) -> HistoryOutcome {
        let url = match Url::parse(YAHOO_CHART_API).and_then(|base| base.join(symbol)) {
            Ok(u) => u,
            Err(e) => return HistoryOutcome::Failed(format!("无效的请求地址: {}", e)),
        };

        let response = self
            .client
            .get(url)
            .query(&[
                ("range", lookback.range_param()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return HistoryOutcome::Failed(format!("请求失败: {}", e)),
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return HistoryOutcome::Empty;
        }
        if !response.status().is_success() {
            return HistoryOutcome::Failed(format!("上游返回 {}", response.status()));
        }

        let json_data: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => return HistoryOutcome::Failed(format!("解析响应失败: {}", e)),
        };

        parse_chart_closes(&json_data)
    }
}

/// 解析 chart 接口响应中的收盘价序列
///
/// 格式: {"chart":{"result":[{"indicators":{"quote":[{"close":[...]}]}}],"error":null}}
/// 停牌日的 close 为 null，过滤后只保留有效收盘价
fn parse_chart_closes(json_data: &serde_json::Value) -> HistoryOutcome {
    let chart = &json_data["chart"];

    if !chart["error"].is_null() {
        // 上游明确报错（代码无效等）按查无处理
        return HistoryOutcome::Empty;
    }

    let closes = &chart["result"][0]["indicators"]["quote"][0]["close"];
    let arr = match closes.as_array() {
        Some(a) => a,
        None => return HistoryOutcome::Empty,
    };

    let series: Vec<f64> = arr.iter().filter_map(|v| v.as_f64()).collect();

    if series.is_empty() {
        HistoryOutcome::Empty
    } else {
        HistoryOutcome::Data(series)
    }
}

#[async_trait]
impl QuoteSource for YahooClient {
    /// 合并抓取：对全部标的并发发起请求，单一标的失败不影响其他
    async fn history(
        &self,
        symbols: &[String],
        lookback: Lookback,
    ) -> HashMap<String, HistoryOutcome> {
        let fetches = symbols.iter().map(|s| async move {
            let outcome = self.fetch_one(s, lookback).await;
            if let HistoryOutcome::Failed(reason) = &outcome {
                log::warn!("抓取 {} 历史行情失败: {}", s, reason);
            }
            (s.clone(), outcome)
        });

        join_all(fetches).await.into_iter().collect()
    }

    /// 自由文字搜索代码或名称
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(YAHOO_SEARCH_API)
            .query(&[
                ("q", query),
                ("quotesCount", "8"),
                ("newsCount", "0"),
                ("listsCount", "0"),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("搜索接口返回 {}", response.status()));
        }

        let json_data: serde_json::Value = response.json().await?;
        let mut hits = Vec::new();

        if let Some(arr) = json_data["quotes"].as_array() {
            for item in arr {
                let symbol = item["symbol"].as_str().unwrap_or("").to_string();
                if symbol.is_empty() {
                    continue;
                }
                // longname 比 shortname 更完整，优先取用
                let name = item["longname"]
                    .as_str()
                    .or_else(|| item["shortname"].as_str())
                    .unwrap_or(&symbol)
                    .to_string();
                hits.push(SearchHit {
                    symbol,
                    name,
                    exchange: item["exchange"].as_str().unwrap_or("").to_string(),
                });
            }
        }

        Ok(hits)
    }
}
