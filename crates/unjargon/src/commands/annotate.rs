//! Annotate command: mark jargon in HTML files.

use std::io::Read;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, info, instrument};

use unjargon_core::activation::{ActivationDecision, ActivationSettings};
use unjargon_core::config::Config;
use unjargon_core::{Dictionary, Document, HtmlError, NullSink, Scanner, html};

use super::activation::describe;
use super::read_input_file;

const STDIN_PATH: &str = "-";
const STDIN_URL: &str = "file:///dev/stdin";

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// HTML files to annotate (`-` reads standard input).
    #[arg(required = true)]
    pub files: Vec<Utf8PathBuf>,

    /// Page URL for the activation rules (default: the file's `file://` URL).
    #[arg(long)]
    pub url: Option<String>,

    /// Annotate even when the activation rules say no.
    #[arg(long)]
    pub force: bool,

    /// Write annotated files into DIR instead of standard output.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct AnnotateReport {
    file: String,
    url: String,
    annotated: bool,
    #[serde(flatten)]
    decision: ActivationDecision,
    term_count: usize,
    translation_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

fn file_url(path: &Utf8Path) -> String {
    let absolute = std::path::absolute(path.as_std_path())
        .map_or_else(|_| path.to_string(), |p| p.display().to_string());
    format!("file://{absolute}")
}

fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<Document> {
    read_bounded(std::io::stdin().lock(), max_bytes)
}

/// Read a whole document, checking the size before decoding.
fn read_bounded(mut reader: impl Read, max_bytes: Option<usize>) -> anyhow::Result<Document> {
    let mut bytes = Vec::new();
    match max_bytes {
        // One byte past the limit is enough to know it was exceeded.
        Some(max) => reader
            .by_ref()
            .take(u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1))
            .read_to_end(&mut bytes),
        None => reader.read_to_end(&mut bytes),
    }
    .context("failed to read standard input")?;
    if let Some(limit) = max_bytes.filter(|&limit| bytes.len() > limit) {
        return Err(HtmlError::TooLarge {
            size: bytes.len(),
            limit,
        })
        .context("failed to read standard input");
    }
    let input = String::from_utf8(bytes).context("standard input is not valid UTF-8")?;
    Ok(html::parse_html(&input))
}

fn output_name(file: &Utf8Path) -> &str {
    if file.as_str() == STDIN_PATH {
        "stdin.html"
    } else {
        file.file_name().unwrap_or("page.html")
    }
}

#[instrument(skip_all, fields(file = %file))]
fn annotate_one(
    file: &Utf8Path,
    args: &AnnotateArgs,
    dictionary: &Dictionary,
    settings: &ActivationSettings,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<AnnotateReport> {
    let (mut doc, default_url) = if file.as_str() == STDIN_PATH {
        (read_stdin(max_input_bytes)?, STDIN_URL.to_string())
    } else {
        let content = read_input_file(file, max_input_bytes)?;
        (html::parse_html(&content), file_url(file))
    };
    let url = args.url.clone().unwrap_or(default_url);

    let mut scanner = Scanner::new(dictionary.clone(), settings.clone(), url.clone(), NullSink);
    let decision = scanner.decision();
    if args.force {
        scanner.activate(&mut doc);
    } else {
        scanner.refresh(&mut doc);
    }
    let (term_count, translation_count) = scanner
        .last_result()
        .map_or((0, 0), |r| (r.term_count, r.translation_count));
    debug!(?decision, terms = term_count, "file scanned");

    let annotated_html = html::to_html(&doc)
        .with_context(|| format!("failed to write annotated HTML for {file}"))?;
    let (output, html) = match &args.output {
        Some(dir) => {
            let target = dir.join(output_name(file));
            std::fs::write(target.as_std_path(), &annotated_html)
                .with_context(|| format!("failed to write {target}"))?;
            (Some(target.to_string()), None)
        }
        None => (None, Some(annotated_html)),
    };

    Ok(AnnotateReport {
        file: file.to_string(),
        url,
        annotated: scanner.is_active(),
        decision,
        term_count,
        translation_count,
        output,
        html,
    })
}

fn progress_bar(files: usize, global_json: bool) -> anyhow::Result<ProgressBar> {
    if files <= 1 || global_json {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(files as u64);
    bar.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")?);
    Ok(bar)
}

fn print_summary(report: &AnnotateReport) {
    if !report.annotated {
        eprintln!(
            "{} {} ({})",
            "SKIPPED:".yellow(),
            report.file,
            describe(&report.decision)
        );
        return;
    }
    let target = report
        .output
        .as_deref()
        .map(|o| format!(" -> {o}"))
        .unwrap_or_default();
    eprintln!(
        "{} {}: {} terms, {} markers{}",
        "ANNOTATED:".green(),
        report.file,
        report.term_count,
        report.translation_count,
        target
    );
}

/// Annotate HTML files and report what was found.
#[instrument(name = "cmd_annotate", skip_all, fields(files = args.files.len()))]
pub fn cmd_annotate(
    args: AnnotateArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    if args.output.is_none() && args.files.len() > 1 {
        bail!("--output is required when annotating more than one file");
    }
    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir.as_std_path())
            .with_context(|| format!("failed to create {dir}"))?;
    }

    let dictionary = Dictionary::load(config.dictionary_path.as_deref());
    let mut settings = config.activation_settings();
    if args.force {
        settings.enabled = true;
    }

    let progress = progress_bar(args.files.len(), global_json)?;
    let mut reports = Vec::with_capacity(args.files.len());
    for file in &args.files {
        progress.set_message(file.to_string());
        let report = annotate_one(file, &args, &dictionary, &settings, max_input_bytes)?;
        progress.inc(1);
        reports.push(report);
    }
    progress.finish_and_clear();

    let total: usize = reports.iter().map(|r| r.term_count).sum();
    info!(files = reports.len(), terms = total, "annotation finished");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        if let Some(html) = &report.html {
            print!("{html}");
        }
        print_summary(report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str =
        "<html><body><h1>Welcome</h1><p>Contact Sales for Enterprise Pricing</p></body></html>";

    fn args(files: Vec<Utf8PathBuf>, output: Option<Utf8PathBuf>) -> AnnotateArgs {
        AnnotateArgs {
            files,
            url: None,
            force: false,
            output,
        }
    }

    fn write_page(tmp: &TempDir, name: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(tmp.path().join(name)).unwrap();
        std::fs::write(&path, PAGE).unwrap();
        path
    }

    #[test]
    fn bounded_read_reports_size_even_mid_character() {
        // "é" is two bytes; reading one past a limit of 3 stops inside it.
        let input = "abcé".as_bytes();
        let err = read_bounded(input, Some(3)).unwrap_err();
        let too_large = err.downcast_ref::<HtmlError>();
        assert_eq!(too_large, Some(&HtmlError::TooLarge { size: 4, limit: 3 }));

        assert!(read_bounded(input, Some(5)).is_ok());
        assert!(read_bounded(input, None).is_ok());
    }

    #[test]
    fn local_file_is_annotated() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "plans.html");
        let dict = Dictionary::bundled().unwrap();
        let settings = Config::default().activation_settings();

        let report = annotate_one(&page, &args(vec![], None), &dict, &settings, None).unwrap();
        assert!(report.annotated);
        assert_eq!(report.decision, ActivationDecision::LocalTestPage);
        assert_eq!(report.term_count, 2);
        assert_eq!(report.translation_count, 2);
        assert!(report.html.unwrap().contains("unjargon-term"));
    }

    #[test]
    fn url_override_can_skip() {
        let tmp = TempDir::new().unwrap();
        let page = write_page(&tmp, "plans.html");
        let dict = Dictionary::bundled().unwrap();
        let settings = Config::default().activation_settings();
        let mut a = args(vec![], None);
        a.url = Some("https://example.com/blog".to_string());

        let report = annotate_one(&page, &a, &dict, &settings, None).unwrap();
        assert!(!report.annotated);
        assert_eq!(report.decision, ActivationDecision::NotApplicable);
        assert_eq!(report.term_count, 0);
        assert!(!report.html.unwrap().contains("unjargon-term"));

        a.force = true;
        let report = annotate_one(&page, &a, &dict, &settings, None).unwrap();
        assert!(report.annotated);
        assert_eq!(report.term_count, 2);
    }

    #[test]
    fn writes_into_output_dir() {
        let tmp = TempDir::new().unwrap();
        let one = write_page(&tmp, "one.html");
        let two = write_page(&tmp, "two.html");
        let out = Utf8PathBuf::try_from(tmp.path().join("out")).unwrap();

        cmd_annotate(args(vec![one, two], Some(out.clone())), true, &Config::default(), None)
            .unwrap();
        let written = std::fs::read_to_string(out.join("two.html")).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("data-original=\"Contact Sales\""));
    }

    #[test]
    fn several_files_need_output_dir() {
        let tmp = TempDir::new().unwrap();
        let one = write_page(&tmp, "one.html");
        let err = cmd_annotate(args(vec![one.clone(), one], None), false, &Config::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("--output"));
    }

    #[test]
    fn output_names() {
        assert_eq!(output_name(Utf8Path::new("-")), "stdin.html");
        assert_eq!(output_name(Utf8Path::new("site/plans.html")), "plans.html");
        assert!(file_url(Utf8Path::new("plans.html")).starts_with("file:///"));
    }
}
