//! Dashboard overview and the detailed campaign report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::CampaignId;
use crate::format::{format_currency, format_number, format_percent, format_ratio};
use crate::marketer::{Marketer, MarketerId};
use crate::metrics::{self, AggregateMetrics, MarketerMetrics};

pub mod endpoints;
pub use endpoints::*;

/// Display strings for the dashboard cards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCards {
    pub total_spend: String,
    pub messages: String,
    pub cost_per_message: String,
    pub reach: String,
    pub cpm: String,
    pub ctr: String,
    pub frequency: String,
    pub thru_play: String,
}

impl DashboardCards {
    pub fn render(totals: &AggregateMetrics) -> DashboardCards {
        DashboardCards {
            total_spend: format_currency(totals.spend),
            messages: format_number(totals.messages),
            cost_per_message: format_currency(totals.cost_per_message),
            reach: format_number(totals.reach),
            cpm: format_currency(totals.cpm),
            ctr: format_percent(totals.avg_ctr),
            frequency: format_ratio(totals.avg_freq),
            thru_play: format_number(totals.thru_play),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub marketer_count: usize,
    pub active_marketer_count: usize,
    pub totals: AggregateMetrics,
    pub cards: DashboardCards,
    pub generated_at: DateTime<Utc>,
}

impl DashboardOverview {
    pub fn build(marketers: &[Marketer]) -> DashboardOverview {
        let totals = metrics::aggregate_all(marketers);

        DashboardOverview {
            marketer_count: marketers.len(),
            active_marketer_count: marketers.iter().filter(|m| m.status.is_active()).count(),
            cards: DashboardCards::render(&totals),
            totals,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub campaign_id: CampaignId,
    pub campaign_name: String,
    pub marketer_id: MarketerId,
    pub marketer_name: String,
    pub metrics: AggregateMetrics,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub totals: AggregateMetrics,
    pub marketers: Vec<MarketerMetrics>,
    pub campaigns: Vec<CampaignRow>,
    pub generated_at: DateTime<Utc>,
}

const CSV_COLUMNS: [&str; 15] = [
    "campaign_id",
    "campaign",
    "marketer",
    "spend",
    "messages",
    "cost_per_message",
    "reach",
    "cpm",
    "ctr",
    "freq",
    "thru_play",
    "leads",
    "orders",
    "revenue",
    "roas",
];

impl Report {
    pub fn build(marketers: &[Marketer]) -> Report {
        let campaigns = marketers
            .iter()
            .flat_map(|marketer| {
                marketer.campaigns.iter().map(move |campaign| CampaignRow {
                    campaign_id: campaign.id.clone(),
                    campaign_name: campaign.name.clone(),
                    marketer_id: marketer.id.clone(),
                    marketer_name: marketer.name.clone(),
                    metrics: metrics::campaign_metrics(campaign),
                })
            })
            .collect();

        Report {
            totals: metrics::aggregate_all(marketers),
            marketers: metrics::breakdown(marketers),
            campaigns,
            generated_at: Utc::now(),
        }
    }

    /// One line per campaign. Text cells are quoted, numbers are raw.
    pub fn to_csv(&self) -> String {
        let mut csv = CSV_COLUMNS.join(",");
        csv.push('\n');
        for row in &self.campaigns {
            let m = &row.metrics;
            let cells = [
                quote(row.campaign_id.as_str()),
                quote(&row.campaign_name),
                quote(&row.marketer_name),
                m.spend.to_string(),
                m.messages.to_string(),
                m.cost_per_message.to_string(),
                m.reach.to_string(),
                m.cpm.to_string(),
                m.avg_ctr.to_string(),
                m.avg_freq.to_string(),
                m.thru_play.to_string(),
                m.leads.to_string(),
                m.orders.to_string(),
                m.revenue.to_string(),
                m.roas.to_string(),
            ];
            csv.push_str(&cells.join(","));
            csv.push('\n');
        }
        csv
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
