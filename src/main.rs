use base64::Engine;
use clap::Parser;
use dialoguer::{Confirm, MultiSelect};
use indicatif::ProgressBar;
use paper_rag::{api, chat, cli, config, error, render, scanner, session};
use paper_rag_common::papers::{DeleteTarget, ListView};
use paper_rag_common::search::ResultsView;
use paper_rag_common::toast::ToastKind;
use paper_rag_common::voice;
use cli::{Cli, Commands, PapersAction};
use config::Config;
use error::Result;
use scanner::LocalFile;
use session::Session;
use std::time::Duration;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn mark(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "✔",
        ToastKind::Error => "✘",
        ToastKind::Info => "ℹ",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .init();

    let mut config = Config::load()?;
    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.effective_base_url());
    tracing::debug!(%base_url, "backend");

    let client = api::ApiClient::new(&base_url, config.timeout_seconds)?;
    let mut session = Session::new(client);

    match cli.command {
        Commands::Upload { paths } => {
            println!("📄 paper-rag - PDFアップロード\n");

            let files = scanner::scan_paths(&paths)?;
            if session.select_files(files) == 0 {
                return Err(error::PaperRagError::NoPdfsFound(
                    paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                ));
            }
            if let Some(summary) = session.upload.summary(&session.state) {
                println!("{}\n  {}\n", summary.heading, summary.preview);
            }

            let pb = spinner("Processing...");
            let report = session.upload().await;
            pb.finish_and_clear();

            if let Some(report) = report {
                println!("{} {}", mark(report.outcome.kind), report.outcome.message);
                if let Some(resp) = &report.response {
                    for file in &resp.files {
                        println!("  - {} → {} ({} chunks)", file.filename, file.paper_id, file.chunks_added);
                    }
                }
                if let Some(stats) = &report.stats {
                    println!("{}", render::stats_line(stats));
                }
            }
        }

        Commands::Search { query, max_results, ingest } => {
            let max_results = max_results.unwrap_or(config.max_results);

            let pb = spinner("Searching ArXiv...");
            let feedback = session.search(&query, max_results).await;
            pb.finish_and_clear();

            let Some(feedback) = feedback else {
                return Ok(());
            };
            if let Some(placeholder) = session.search.view().placeholder() {
                println!("{}", placeholder);
            }
            if let Some(fb) = &feedback {
                println!("{} {}\n", mark(fb.kind), fb.message);
            }

            if session.search.view() != ResultsView::List {
                return Ok(());
            }
            let items = session.search.items(&session.state);
            println!("{}", render::result_items(&items));

            if ingest {
                let choices: Vec<String> = items.iter().map(render::result_choice).collect();
                let chosen = MultiSelect::new()
                    .with_prompt("取り込む論文を選択（Spaceで選択、Enterで確定）")
                    .items(&choices)
                    .interact()?;
                for index in chosen {
                    session.toggle_result(index);
                }

                let pb = spinner("Ingesting...");
                let report = session.ingest_selected().await;
                pb.finish_and_clear();

                match report {
                    Some(report) => {
                        println!("\n{} {}", mark(report.feedback.kind), report.feedback.message);
                        if let Some(resp) = &report.response {
                            println!("{}", render::ingest_breakdown(resp));
                        }
                        if let Some(stats) = &report.stats {
                            println!("{}", render::stats_line(stats));
                        }
                    }
                    None => println!("論文が選択されていません"),
                }
            }
        }

        Commands::Ingest { paper_ids } => {
            let pb = spinner("Ingesting...");
            let result = session.api().ingest_papers(&paper_ids).await;
            pb.finish_and_clear();

            match result {
                Ok(resp) if resp.success => {
                    println!("✔ {} papers ingested successfully!", paper_ids.len());
                    println!("{}", render::ingest_breakdown(&resp));
                    if let Some(stats) = session.refresh_stats().await {
                        println!("{}", render::stats_line(&stats));
                    }
                }
                Ok(resp) => {
                    println!("✘ Error ingesting papers");
                    println!("{}", render::ingest_breakdown(&resp));
                }
                Err(e) => {
                    tracing::warn!("Ingest error: {}", e);
                    println!("✘ Error ingesting papers");
                }
            }
        }

        Commands::Ask { question, image } => {
            if let Some(path) = image {
                if !path.is_file() {
                    return Err(error::PaperRagError::FileNotFound(path.display().to_string()));
                }
                session.attach_image(&LocalFile::new(&path))?;
            }

            let pb = spinner("Thinking...");
            let ai_id = session.ask(&question).await;
            pb.finish_and_clear();

            if let Some(msg) = ai_id.and_then(|id| session.conversation.get(id)) {
                println!("{}", render::message(msg));
            }
        }

        Commands::Chat => {
            chat::run_interactive_chat(&mut session).await?;
        }

        Commands::Stats => match session.api().stats().await {
            Ok(stats) => println!("{}", render::stats_line(&stats)),
            Err(e) => {
                tracing::warn!("Error loading stats: {}", e);
                println!("✘ 統計を取得できませんでした");
            }
        },

        Commands::Papers { action } => match action {
            PapersAction::List => {
                session.papers.open();
                session.load_papers().await;
                if session.papers.view() == ListView::Error {
                    println!("{}", paper_rag_common::papers::MSG_LOAD_FAILED);
                } else {
                    println!("{}", render::papers(&session.papers));
                }
            }

            PapersAction::Show { paper_id } => match session.paper_detail(&paper_id).await {
                Some(view) => println!("{}", render::paper_detail(&view)),
                None => println!("✘ {}", paper_rag_common::papers::MSG_DETAIL_FAILED),
            },

            PapersAction::Delete { paper_ids, yes } => {
                session.papers.open();
                session.load_papers().await;

                let target = if paper_ids.len() == 1 {
                    DeleteTarget::Single(paper_ids[0].clone())
                } else {
                    DeleteTarget::Selected(paper_ids)
                };

                let confirmed = yes
                    || Confirm::new()
                        .with_prompt(session.papers.confirm_message(&target))
                        .default(false)
                        .interact()?;
                if !confirmed {
                    println!("キャンセルしました");
                    return Ok(());
                }

                let (outcome, stats) = session.delete(&target).await;
                if let Some(outcome) = outcome {
                    println!("{} {}", mark(outcome.kind), outcome.message);
                }
                if session.papers.view() != ListView::Error {
                    println!("{}", render::papers(&session.papers));
                }
                if let Some(stats) = &stats {
                    println!("{}", render::stats_line(stats));
                }
                session.papers.close();
            }
        },

        Commands::Voice { audio, save_reply } => {
            if !audio.is_file() {
                return Err(error::PaperRagError::FileNotFound(audio.display().to_string()));
            }

            let pb = spinner(voice::STATUS_PROCESSING);
            let report = session.voice_query(&LocalFile::new(&audio)).await;
            pb.finish_and_clear();

            if let Some((user_id, ai_id)) = report.messages {
                for id in [user_id, ai_id] {
                    if let Some(msg) = session.conversation.get(id) {
                        println!("{}", render::message(msg));
                    }
                }
            }
            println!("{} {}", mark(report.kind), report.message);

            let reply_path = config.reply_audio_path(save_reply);
            if let (Some(path), Some(audio_base64)) = (reply_path, report.audio_base64) {
                let bytes = base64::engine::general_purpose::STANDARD.decode(audio_base64)?;
                std::fs::write(&path, bytes)?;
                println!("✔ 応答音声を保存: {}", path.display());
            }
        }

        Commands::Speak { text, lang, output } => {
            let lang = lang.unwrap_or_else(|| config.tts_lang.clone());
            let bytes = session.api().synthesize(&text, &lang).await?;
            std::fs::write(&output, bytes)?;
            println!("✔ 音声を保存: {}", output.display());
        }

        Commands::Config { set_base_url, set_max_results, toggle_voice, show } => {
            let mut changed = false;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                changed = true;
                println!("✔ バックエンドURLを設定しました");
            }

            if let Some(n) = set_max_results {
                config.set_max_results(n)?;
                changed = true;
                println!("✔ 検索の最大件数を設定しました");
            }

            if toggle_voice {
                let enabled = config.toggle_voice();
                changed = true;
                println!("✔ {}", voice::toggle_message(enabled).0);
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  バックエンドURL: {}", config.base_url);
                println!("  使用中のURL: {}", base_url);
                println!("  検索の最大件数: {}", config.max_results);
                println!("  読み上げ言語: {}", config.tts_lang);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  音声モード: {}", if config.voice_enabled { "ON" } else { "OFF" });
            }
        }
    }

    Ok(())
}
