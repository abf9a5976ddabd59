use std::io::Read;
use std::path::Path;

use mindscan_core::fusion::{combine, ImageClassifier, ModalityReading, TextClassifier};
use mindscan_core::storage::NewEntry;
use mindscan_core::trend::TrendSummary;
use mindscan_core::EntryStore;

use crate::app::AppContext;
use crate::classifier::CommandClassifier;
use crate::cli::{AddArgs, TrendsArgs};
use crate::errors::CliError;
use crate::output::{print_trends, trends_json};

/// Read `--text`, where "-" means stdin.
fn read_text(value: Option<&str>) -> anyhow::Result<String> {
    match value {
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read text from stdin: {}", e))?;
            Ok(buffer)
        }
        Some(text) => Ok(text.to_string()),
        None => Ok(String::new()),
    }
}

fn read_text_signal(
    ctx: &AppContext,
    text: &str,
    args: &AddArgs,
) -> anyhow::Result<Option<ModalityReading>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    if let Some(sentiment) = args.sentiment {
        if !(-1.0..=1.0).contains(&sentiment) {
            return Err(CliError::invalid_input(format!(
                "Sentiment must be within [-1, 1] (got {})",
                sentiment
            ))
            .into());
        }
        return Ok(Some(ModalityReading {
            sentiment,
            emotion: args.emotion.clone(),
        }));
    }

    let command = ctx.config()?.classifiers.text_command.as_deref();
    match command.and_then(CommandClassifier::new) {
        Some(classifier) => Ok(classifier.classify_text(text)),
        None => {
            tracing::info!("no text classifier configured; text saved without a reading");
            Ok(None)
        }
    }
}

fn read_image_signal(
    ctx: &AppContext,
    args: &AddArgs,
) -> anyhow::Result<Option<ModalityReading>> {
    if let Some(label) = args.face.as_deref() {
        return Ok(Some(ModalityReading::from_face_label(label)));
    }

    let Some(path) = args.image.as_deref() else {
        return Ok(None);
    };
    let path = Path::new(path);
    if !path.exists() {
        return Err(CliError::not_found(
            format!("Image not found: {}", path.display()),
            "Hint: Pass an existing PNG or JPEG file to --image.",
        )
        .into());
    }
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read image {}: {}", path.display(), e))?;

    let command = ctx.config()?.classifiers.image_command.as_deref();
    match command.and_then(CommandClassifier::new) {
        Some(classifier) => Ok(classifier.classify_image(&bytes)),
        None => {
            if !ctx.quiet() {
                eprintln!(
                    "Image analysis requires an image classifier in the config. Only text was analyzed."
                );
            }
            Ok(None)
        }
    }
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let text = read_text(args.text.as_deref())?;
    if text.trim().is_empty() && args.face.is_none() && args.image.is_none() {
        return Err(CliError::invalid_input(
            "Please enter text (--text) or an image (--image/--face).",
        )
        .into());
    }

    let store = ctx.open_store()?;
    let session = ctx.authenticate(&store, &args.credentials)?;

    let text_reading = read_text_signal(ctx, &text, args)?;
    let image_reading = read_image_signal(ctx, args)?;
    let fused = combine(text_reading.as_ref(), image_reading.as_ref());

    let id = store.insert_entry(&NewEntry::new(
        session.user_id,
        text.trim(),
        fused.sentiment,
        &fused.emotion,
    ))?;
    tracing::debug!(entry_id = id, user_id = session.user_id, "entry saved");

    if args.json {
        let value = serde_json::json!({
            "id": id,
            "user_id": session.user_id,
            "sentiment": fused.sentiment,
            "emotion": fused.emotion,
            "text_analyzed": text_reading.is_some(),
            "image_analyzed": image_reading.is_some(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if ctx.quiet() {
        println!("{}", id);
    } else {
        println!(
            "Saved! Sentiment={:.2}, Emotion={}",
            fused.sentiment, fused.emotion
        );
    }
    Ok(())
}

pub fn handle_trends(ctx: &AppContext, args: &TrendsArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let session = ctx.authenticate(&store, &args.credentials)?;
    let days = match args.days {
        Some(days) => days,
        None => ctx.config()?.trends.default_days,
    };

    let records = store.fetch_entries(session.user_id, days)?;
    let summary = TrendSummary::from_records(&records);

    if args.json {
        let value = trends_json(days, &records, &summary);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_trends(days, &records, &summary, ctx.quiet());
    }
    Ok(())
}
