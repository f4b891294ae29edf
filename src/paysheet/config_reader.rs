use crate::paysheet::*;

use serde::Deserialize;
use std::collections::HashMap;

/// The JSON configuration of a run. All the keys are optional.
#[derive(PartialEq, Debug, Clone, Default, Deserialize)]
pub struct PayConfig {
    #[serde(rename = "baseRates", default)]
    pub base_rates: HashMap<String, f64>,
    #[serde(rename = "ohRates", default)]
    pub oh_rates: HashMap<String, f64>,
    #[serde(rename = "workMeetingRate")]
    pub work_meeting_rate: Option<f64>,
    #[serde(rename = "adminMeetingRate")]
    pub admin_meeting_rate: Option<f64>,
    #[serde(rename = "highlightThreshold")]
    pub highlight_threshold: Option<f64>,
}

const DEFAULT_HIGHLIGHT_THRESHOLD: f64 = 4.0;

impl PayConfig {
    pub fn pay_rules(&self) -> PayRules {
        let defaults = PayRules::DEFAULT_RULES;
        PayRules {
            work_meeting_rate: self
                .work_meeting_rate
                .unwrap_or(defaults.work_meeting_rate),
            admin_meeting_rate: self
                .admin_meeting_rate
                .unwrap_or(defaults.admin_meeting_rate),
        }
    }

    pub fn rate_table(&self) -> RateTable {
        RateTable {
            base: self.base_rates.clone(),
            oh: self.oh_rates.clone(),
        }
    }

    pub fn highlight_threshold(&self) -> f64 {
        self.highlight_threshold
            .unwrap_or(DEFAULT_HIGHLIGHT_THRESHOLD)
    }
}

pub fn parse_config(contents: &str) -> PaysheetResult<PayConfig> {
    let config: PayConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_config(path: &str) -> PaysheetResult<PayConfig> {
    info!("Reading configuration {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn read_summary(path: &str) -> PaysheetResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
