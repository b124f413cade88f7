use anyhow::{Context, Result};
use std::io::Write;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "llm";
pub const DEFAULT_MODEL: &str = "o1-mini";

const INSTRUCTIONS: &str = "Analyze these Hacker News comments and provide a summary of the \
main discussion themes. Include relevant quotes with author attribution where appropriate: ";

/// Build the full prompt handed to the summarizer.
///
/// The comments are embedded verbatim. They reach the tool as a single argv
/// entry, so quotes need no escaping.
pub fn build_prompt(comments: &str) -> String {
    format!("{}{}.", INSTRUCTIONS, comments)
}

/// Everything the summarizer produced during one run.
#[derive(Debug, Clone)]
pub struct SummaryOutput {
    /// Standard output, byte for byte as streamed
    pub text: String,
    pub stderr_lines: Vec<String>,
    pub success: bool,
}

/// An external text-generation command, invoked as
/// `program [extra_args..] -m <model> <prompt>`.
#[derive(Debug, Clone)]
pub struct SummarizerCommand {
    program: String,
    extra_args: Vec<String>,
    model: String,
}

impl SummarizerCommand {
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            model: model.into(),
        }
    }

    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn args(&self, prompt: &str) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.push("-m".to_string());
        args.push(self.model.clone());
        args.push(prompt.to_string());
        args
    }

    /// Run the summarizer, echoing its output to `console` as it arrives.
    ///
    /// Standard error is echoed after standard output closes, each line
    /// prefixed with `Error: `. A tool that cannot be started, a non-zero
    /// exit and undecodable output are all reported in the result and on
    /// the console, never as an error, so whatever was captured can still
    /// be saved.
    pub async fn summarize<W: Write>(&self, prompt: &str, console: &mut W) -> Result<SummaryOutput> {
        let spawned = Command::new(&self.program)
            .args(self.args(prompt))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                let message = format!("Failed to start summarizer '{}': {}", self.program, e);
                tracing::warn!(program = %self.program, error = %e, "could not start summarizer");
                writeln!(console, "Error: {}", message)?;
                console.flush()?;
                return Ok(SummaryOutput {
                    text: String::new(),
                    stderr_lines: vec![message],
                    success: false,
                });
            }
        };

        let stdout = child
            .stdout
            .take()
            .context("Summarizer stdout was not captured")?;
        let stderr = child
            .stderr
            .take()
            .context("Summarizer stderr was not captured")?;

        // Drain stderr alongside stdout so a full stderr pipe cannot stall the tool
        let stderr_task = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr);
            let mut collected = Vec::new();
            loop {
                match read_lossy_line(&mut reader).await {
                    Ok(Some(line)) => {
                        collected.push(line.trim_end_matches(['\n', '\r']).to_string())
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "stopped reading summarizer stderr");
                        break;
                    }
                }
            }
            collected
        });

        let text = stream_lines(BufReader::new(stdout), console).await?;

        let stderr_lines = stderr_task
            .await
            .context("Summarizer stderr reader failed")?;
        for line in &stderr_lines {
            writeln!(console, "Error: {}", line)?;
        }
        console.flush()?;

        let status = child
            .wait()
            .await
            .context("Failed to wait for summarizer")?;
        if !status.success() {
            tracing::warn!(program = %self.program, %status, "summarizer exited unsuccessfully");
        }

        Ok(SummaryOutput {
            text,
            stderr_lines,
            success: status.success(),
        })
    }
}

/// Next line including its terminator, with invalid UTF-8 replaced.
async fn read_lossy_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Echo each line from `reader` to `console` and return everything read.
///
/// Line terminators are preserved, so for UTF-8 output the result is
/// exactly the input.
pub async fn stream_lines<R, W>(mut reader: R, console: &mut W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut text = String::new();

    while let Some(line) = read_lossy_line(&mut reader)
        .await
        .context("Failed to read summarizer output")?
    {
        console.write_all(line.as_bytes())?;
        console.flush()?;
        text.push_str(&line);
    }

    Ok(text)
}
