use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codesage")]
#[command(about = "画像のAI生成判定・テキスト抽出クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析APIのベースURL（環境変数 CODESAGE_API_URL・設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像ファイル/フォルダをアップロードして解析
    Analyze {
        /// 画像ファイルまたはフォルダ（複数指定可）
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話モード（モード選択 → 画像追加 → 解析 → 結果）
    Interactive,

    /// 設定を表示/編集
    Config {
        /// 解析APIのベースURLを設定
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
