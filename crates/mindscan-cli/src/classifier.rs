//! External classifiers run as child processes.
//!
//! The CLI ships no models. A classifier is any program that reads the raw
//! input on stdin and prints a JSON reading on stdout. Any failure (spawn,
//! non-zero exit, bad JSON) makes that modality absent.

use std::io::Write;
use std::process::{Command, Stdio};

use mindscan_core::fusion::{ImageClassifier, ModalityReading, TextClassifier};

#[derive(Debug, Clone)]
pub struct CommandClassifier {
    argv: Vec<String>,
}

impl CommandClassifier {
    /// `None` if `argv` is empty.
    pub fn new(argv: &[String]) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        Some(Self {
            argv: argv.to_vec(),
        })
    }

    fn run(&self, input: &[u8]) -> anyhow::Result<ModalityReading> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("empty classifier command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from another thread so a chatty child cannot deadlock us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("classifier stdin unavailable"))?;
        let payload = input.to_vec();
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child.wait_with_output()?;
        if let Ok(Err(err)) = writer.join() {
            // A classifier may legitimately exit before reading everything.
            tracing::debug!(error = %err, "classifier closed stdin early");
        }

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let reading: ModalityReading = serde_json::from_slice(&output.stdout)?;
        if !reading.sentiment.is_finite() {
            return Err(anyhow::anyhow!("non-finite sentiment"));
        }
        Ok(reading)
    }

    fn classify(&self, input: &[u8]) -> Option<ModalityReading> {
        match self.run(input) {
            Ok(reading) => Some(reading),
            Err(err) => {
                tracing::warn!(
                    program = %self.argv[0],
                    error = %err,
                    "classifier failed; treating modality as absent"
                );
                None
            }
        }
    }
}

impl TextClassifier for CommandClassifier {
    fn classify_nonblank(&self, text: &str) -> Option<ModalityReading> {
        self.classify(text.as_bytes())
    }
}

impl ImageClassifier for CommandClassifier {
    fn classify_image(&self, image: &[u8]) -> Option<ModalityReading> {
        self.classify(image)
    }
}
