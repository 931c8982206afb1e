use clap::Parser;
use magicpixels::{cli, config, error, files, http, logging, runner, session};
use cli::{Cli, Commands, QueryCommand};
use config::Config;
use error::{MagicPixelsError, Result};
use http::ReqwestTransport;
use magicpixels_common::preview::{self, DownloadTracker};
use magicpixels_common::tools::WatermarkOptions;
use magicpixels_common::{ApiClient, AppStore};
use runner::Invocation;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    // 設定の編集はAPIに接続しない
    if let Commands::Config { set_api_url, show } = &cli.command {
        let mut config = config;

        if let Some(url) = set_api_url {
            config.set_api_url(url.clone())?;
            println!("✔ APIのベースURLを設定しました: {}", config.api_base_url);
        }

        if *show {
            println!("設定:");
            println!("  APIのベースURL: {}", config.resolve_api_url(cli.api_url.as_deref())?);
            println!("  タイムアウト: {}秒", config.timeout_seconds);
            println!("  最大アップロードサイズ: {}", magicpixels_common::uploader::format_bytes(config.max_upload_bytes));
            println!("  保存先: {}", config.download_dir().display());
        }
        return Ok(());
    }

    let transport = ReqwestTransport::from_config(&config, cli.api_url.as_deref())?;
    let client = ApiClient::new(transport);
    let mut store = AppStore::new();
    let max_bytes = config.max_upload_bytes;

    let invocation = match cli.command {
        Commands::Resize { input, width, height, no_keep_aspect, fit, quality, preset, sizes, output } => {
            if !sizes.is_empty() {
                let sizes = sizes
                    .iter()
                    .map(|s| cli::parse_size(s))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(MagicPixelsError::InvalidArgs)?;
                let file = files::load_file(&input)?;
                println!("📐 {}サイズを一括生成中...", sizes.len());
                let data = client.resize_batch(&file, &sizes).await?;
                print_json(&data)?;
                return Ok(());
            }

            let dimensions = files::image_dimensions(&input);
            let request = runner::resize_request(
                width,
                height,
                !no_keep_aspect,
                fit,
                quality,
                preset.as_deref(),
                dimensions,
            )?;
            Invocation::image(request, &input, &output)
        }

        Commands::Compress { input, quality, target_kb, output } => {
            Invocation::image(runner::compress_request(quality, target_kb), &input, &output)
        }

        Commands::Convert { input, format, quality, formats, output } => {
            if !formats.is_empty() {
                let file = files::load_file(&input)?;
                let data = client.convert_multi(&file, &formats).await?;
                print_json(&data)?;
                return Ok(());
            }
            Invocation::image(runner::convert_request(format, quality), &input, &output)
        }

        Commands::Crop { input, ratio, gravity, circle, rect, output } => {
            let dimensions = files::image_dimensions(&input);
            let request = runner::crop_request(ratio, gravity, circle, rect, dimensions)?;
            Invocation::image(request, &input, &output)
        }

        Commands::BgRemove { input, color, output } => {
            Invocation::image(runner::background_request(color.as_deref()), &input, &output)
        }

        Commands::Watermark { input, method, strength, detect, output } => {
            let request = runner::watermark_request(WatermarkOptions { method, strength }, detect);
            Invocation::image(request, &input, &output)
        }

        Commands::Pdf { command } => runner::pdf_invocation(&command),

        Commands::AiEdit { input, prompt, output } => {
            Invocation::image(runner::ai_edit_request(&prompt), &input, &output)
        }

        Commands::AiEnhance { input, auto_apply, output } => Invocation::image(
            magicpixels_common::ToolRequest::AiEnhance { auto_apply },
            &input,
            &output,
        ),

        Commands::Cloud { tool, input, options, output } => {
            Invocation::image(runner::cloud_request(&tool, &options)?, &input, &output)
        }

        Commands::Download { public_id, format, output } => {
            let status = client.track_download(&public_id, &format).await?;
            let url = status
                .download_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| MagicPixelsError::Download(preview::DOWNLOAD_FAILED.into()))?;

            let bytes = client.fetch_bytes(&url).await?;
            let file_name = preview::timestamped_file_name(chrono::Local::now().timestamp_millis(), &format);
            let target = output.unwrap_or_else(|| config.download_dir());
            let path = files::output_path(&target, &file_name);
            files::write_output(&path, &bytes)?;

            let mut tracker = DownloadTracker::default();
            tracker.apply(&status);
            println!("✔ {}: {}", preview::downloaded_as(&format), path.display());
            println!("  {}", tracker.downloaded_message());
            return Ok(());
        }

        Commands::Status { public_id } => {
            let status = client.download_status(&public_id).await?;
            let mut tracker = DownloadTracker::default();
            tracker.apply(&status);
            println!("{} ({}%)", tracker.label(), tracker.percent());
            println!("  {}", tracker.hint());
            return Ok(());
        }

        Commands::Query { command } => {
            let data = match command {
                QueryCommand::Formats => client.supported_formats().await?,
                QueryCommand::Filters => client.cloudinary_filters().await?,
                QueryCommand::CropPresets => client.crop_presets().await?,
                QueryCommand::Upload { inputs } => {
                    let uploader = magicpixels_common::UploaderConfig::images().with_max_bytes(max_bytes);
                    let loaded = files::load_inputs(&inputs, &uploader)?;
                    match loaded.as_slice() {
                        [] => {
                            let shown: Vec<String> = inputs.iter().map(|p| p.display().to_string()).collect();
                            return Err(MagicPixelsError::NoImagesFound(shown.join(", ")));
                        }
                        [file] => serde_json::to_value(client.upload(file).await?)?,
                        _ => client.upload_multiple(&loaded).await?,
                    }
                }
                QueryCommand::Analyze { input, prompt } => {
                    client.ai_analyze(&files::load_file(&input)?, prompt.as_deref()).await?
                }
                QueryCommand::Ideas { input } => client.ai_ideas(&files::load_file(&input)?).await?,
                QueryCommand::AltText { input } => client.alt_text(&files::load_file(&input)?).await?,
            };
            print_json(&data)?;
            return Ok(());
        }

        Commands::Health => {
            let data = client.health().await?;
            println!("✔ API: {}", client.transport().base_url());
            print_json(&data)?;
            return Ok(());
        }

        Commands::Session { input } => {
            let download_dir = config.download_dir();
            session::run_interactive(client, &input, &download_dir).await?;
            return Ok(());
        }

        Commands::Config { .. } => return Ok(()),
    };

    let mut invocation = invocation;
    invocation.uploader = invocation.uploader.with_max_bytes(max_bytes);
    if !invocation.output.json {
        println!("🖼  magicpixels - {}\n", invocation.request.tool_name());
    }

    let output = runner::run_tool(&client, &mut store, &invocation).await?;
    runner::finish_output(&client, &output, &invocation.output).await?;

    if let Some(record) = store.processed_image() {
        tracing::debug!(tool = ?record.tool, url = %record.url, "Processed image stored");
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
