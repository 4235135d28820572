use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "paper-rag")]
#[command(about = "論文RAGクライアント（PDF取り込み・ArXiv検索・質問応答・音声クエリ）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// PDFをアップロードして取り込む
    Upload {
        /// PDFファイルまたはフォルダ（PDF以外は無視）
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// ArXivを検索
    Search {
        /// 検索語
        #[arg(required = true)]
        query: String,

        /// 最大件数（省略時は設定値）
        #[arg(short = 'n', long)]
        max_results: Option<u32>,

        /// 結果から選んで取り込む
        #[arg(long)]
        ingest: bool,
    },

    /// ArXiv論文をIDで取り込む
    Ingest {
        /// ArXiv ID
        #[arg(required = true)]
        paper_ids: Vec<String>,
    },

    /// 1回だけ質問する
    Ask {
        /// 質問文
        question: String,

        /// 添付画像
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// 対話モードで質問する（/image FILE で画像添付、/quit で終了）
    Chat,

    /// 取り込み済みの件数を表示
    Stats,

    /// 取り込み済み論文の管理
    Papers {
        #[command(subcommand)]
        action: PapersAction,
    },

    /// 録音済み音声ファイルで音声クエリ
    Voice {
        /// 音声ファイル（webm/mp3/wav など）
        #[arg(required = true)]
        audio: PathBuf,

        /// 応答音声の保存先（省略時は音声モードONなら voice-reply.mp3）
        #[arg(long)]
        save_reply: Option<PathBuf>,
    },

    /// テキストを読み上げ音声に変換
    Speak {
        /// 読み上げるテキスト
        #[arg(required = true)]
        text: String,

        /// 言語（省略時は設定値）
        #[arg(long)]
        lang: Option<String>,

        /// 出力ファイル
        #[arg(short, long, required = true)]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 検索の最大件数を設定
        #[arg(long)]
        set_max_results: Option<u32>,

        /// 音声モードを切り替え（ONなら voice の応答音声を自動保存）
        #[arg(long)]
        toggle_voice: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum PapersAction {
    /// 一覧表示
    List,

    /// 詳細表示（チャンクのプレビュー）
    Show {
        #[arg(required = true)]
        paper_id: String,
    },

    /// 削除（取り消し不可）
    Delete {
        #[arg(required = true)]
        paper_ids: Vec<String>,

        /// 確認を省略
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_ingest() {
        let cli = Cli::parse_from(["paper-rag", "search", "transformers", "-n", "5", "--ingest"]);
        match cli.command {
            Commands::Search { query, max_results, ingest } => {
                assert_eq!(query, "transformers");
                assert_eq!(max_results, Some(5));
                assert!(ingest);
            }
            _ => panic!("search expected"),
        }
    }

    #[test]
    fn test_parse_papers_delete() {
        let cli = Cli::parse_from(["paper-rag", "-v", "papers", "delete", "a", "b", "--yes"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Papers { action: PapersAction::Delete { paper_ids, yes } } => {
                assert_eq!(paper_ids, vec!["a", "b"]);
                assert!(yes);
            }
            _ => panic!("papers delete expected"),
        }
    }

    #[test]
    fn test_upload_requires_paths() {
        assert!(Cli::try_parse_from(["paper-rag", "upload"]).is_err());
    }
}
