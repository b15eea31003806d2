//! 解析結果の表示とJSON保存

use chrono::{DateTime, Local};
use codesage_common::{AnalysisResult, Image, Notice, NoticeLevel, ViewController};
use serde::Serialize;
use std::path::Path;

use crate::error::Result;

const METER_WIDTH: usize = 30;

/// `--output` で保存するレポート
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analyzed_at: DateTime<Local>,
    pub api_url: String,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub index: usize,
    pub file_name: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn from_controller(controller: &ViewController, api_url: &str) -> Self {
        let items = controller
            .pairs()
            .enumerate()
            .map(|(index, (image, result))| ReportItem {
                index,
                file_name: image.upload_file_name(index),
                result: result.clone(),
            })
            .collect();

        Self {
            analyzed_at: Local::now(),
            api_url: api_url.to_string(),
            items,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// 人間らしさのメーター（例: `[##########----------]`）
pub fn meter(result: &AnalysisResult) -> String {
    let filled = (result.human_meter_fraction() * METER_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(METER_WIDTH - filled))
}

/// 結果1件分の表示テキスト
pub fn render_result(index: usize, image: &Image, result: &AnalysisResult) -> String {
    let verdict = if result.is_likely_human() { "likely human" } else { "possibly AI" };
    let text = if result.extracted_text.trim().is_empty() {
        "(no text extracted)".to_string()
    } else {
        result
            .extracted_text
            .lines()
            .map(|line| format!("    {}", line))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "#{} {}\n  Human: {}%  AI: {}%  ({})\n  {}\n  Extracted Text:\n{}",
        index + 1,
        image.upload_file_name(index),
        result.human_percentage,
        result.ai_percentage,
        verdict,
        meter(result),
        text
    )
}

pub fn print_results(controller: &ViewController) {
    println!("Analysis Results\n");
    for (index, (image, result)) in controller.pairs().enumerate() {
        println!("{}\n", render_result(index, image, result));
    }
}

pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("✔ {}", notice.message),
            NoticeLevel::Info => println!("- {}", notice.message),
            NoticeLevel::Error => eprintln!("✖ {}", notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(human: f64, text: &str) -> AnalysisResult {
        AnalysisResult {
            human_percentage: human,
            ai_percentage: 100.0 - human,
            extracted_text: text.to_string(),
        }
    }

    #[test]
    fn test_meter_width() {
        assert_eq!(meter(&sample(0.0, "")), format!("[{}]", "-".repeat(METER_WIDTH)));
        assert_eq!(meter(&sample(100.0, "")), format!("[{}]", "#".repeat(METER_WIDTH)));
        assert_eq!(meter(&sample(150.0, "")).len(), METER_WIDTH + 2);
    }

    #[test]
    fn test_render_result() {
        let image = Image::new(vec![1], "image/png").with_file_name("code.png");
        let text = render_result(0, &image, &sample(80.0, "line one\nline two"));

        assert!(text.starts_with("#1 code.png"));
        assert!(text.contains("Human: 80%  AI: 20%  (likely human)"));
        assert!(text.contains("    line one\n    line two"));
    }

    #[test]
    fn test_render_result_without_text() {
        let image = Image::new(vec![1], "image/jpeg");
        let text = render_result(2, &image, &sample(10.0, "  "));
        assert!(text.starts_with("#3 image-2.jpg"));
        assert!(text.contains("possibly AI"));
        assert!(text.contains("(no text extracted)"));
    }

    #[test]
    fn test_report_item_serializes_flat() {
        let item = ReportItem {
            index: 0,
            file_name: "a.png".into(),
            result: sample(60.0, "x"),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"fileName\":\"a.png\""));
        assert!(json.contains("\"humanPercentage\":60.0"));
        assert!(json.contains("\"extractedText\":\"x\""));
    }
}
