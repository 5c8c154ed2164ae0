// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Mustekala CLI - Headless WebForms Client
//!
//! Example usage and demonstration of the mustekala library.

use std::env;
use std::process::ExitCode;

use url::Url;

use mustekala::{
    Authenticator, ControlResolver, Credentials, ExportRequest, FormsAuthenticator, PostbackState,
    ReportExporter, Session,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mustekala=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "inspect" => {
            if args.len() < 3 {
                eprintln!("Usage: mustekala inspect <url>");
                return ExitCode::from(1);
            }
            inspect_page(&args[2]).await
        }
        "login" => {
            if args.len() < 3 {
                eprintln!("Usage: mustekala login <url>");
                return ExitCode::from(1);
            }
            check_login(&args[2]).await
        }
        "export" => {
            if args.len() < 4 {
                eprintln!("Usage: mustekala export <report-url> <out-path> [field=value ...]");
                return ExitCode::from(1);
            }
            run_export(&args[2], &args[3], &args[4..]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("mustekala {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Mustekala - Headless ASP.NET WebForms Client

USAGE:
    mustekala <COMMAND> [OPTIONS]

COMMANDS:
    inspect <url>                       Show postback state and resolved controls for a page
    login <url>                         Attempt a WebForms login (credentials from env)
    export <url> <out> [field=value]    Run a report export and save the artifact
    help                                Show this help message
    version                             Show version information

ENVIRONMENT:
    MUSTEKALA_USER      Username for the login command
    MUSTEKALA_PASS      Password for the login command

EXAMPLES:
    mustekala inspect https://portal.example/login.aspx
    MUSTEKALA_USER=joao MUSTEKALA_PASS=... mustekala login https://portal.example/login.aspx
    mustekala export https://portal.example/reports/prod.aspx out.pdf ddlMes=05 ddlAno=2024
"#
    );
}

async fn inspect_page(url: &str) -> ExitCode {
    println!("Inspecting: {}", url);

    let session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to create session: {}", e);
            return ExitCode::from(1);
        }
    };

    let response = match session.get(url).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to fetch page: {}", e);
            return ExitCode::from(1);
        }
    };

    println!("\n=== Response ===");
    println!("Status: {}", response.status);
    println!("URL: {}", response.url);
    println!("Size: {} bytes", response.body_len());

    let doc = mustekala::parse_html_with_url(&response.text_lossy(), Some(response.url.clone()));

    let state = PostbackState::extract(&doc);
    println!("\n=== Postback State ===");
    println!("__VIEWSTATE: {}", describe(&state.view_state));
    println!("__VIEWSTATEGENERATOR: {}", describe(&state.generator));
    println!("__EVENTVALIDATION: {}", describe(&state.event_validation));
    println!(
        "Action URL: {}",
        mustekala::resolve_action_url(&response.url, &doc)
    );

    let resolver = ControlResolver::new();
    println!("\n=== Resolved Controls ===");
    match resolver.resolve_username_field(&doc) {
        Some(m) => println!(
            "Username: {} ({})",
            m.name,
            m.keyword.as_deref().unwrap_or("first text input")
        ),
        None => println!("Username: <none>"),
    }
    match resolver.resolve_password_field(&doc) {
        Some(m) => println!(
            "Password: {} ({})",
            m.name,
            m.keyword.as_deref().unwrap_or("first password input")
        ),
        None => println!("Password: <none>"),
    }
    match resolver.resolve_submit_control(&doc) {
        Some(m) => println!("Submit: {} = {:?} ({})", m.name, m.value, m.keyword),
        None => println!("Submit: <none> (implicit submission)"),
    }
    match resolver.resolve_export_control(&doc) {
        Some(m) => println!("Export: {:?} ({})", m.control, m.keyword),
        None => println!("Export: <none>"),
    }

    ExitCode::SUCCESS
}

async fn check_login(url: &str) -> ExitCode {
    let (username, password) = match (env::var("MUSTEKALA_USER"), env::var("MUSTEKALA_PASS")) {
        (Ok(u), Ok(p)) => (u, p),
        _ => {
            eprintln!("Set MUSTEKALA_USER and MUSTEKALA_PASS");
            return ExitCode::from(1);
        }
    };

    let login_url = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Invalid URL: {}", e);
            return ExitCode::from(1);
        }
    };

    let session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to create session: {}", e);
            return ExitCode::from(1);
        }
    };

    let authenticator = FormsAuthenticator::new(login_url);
    match authenticator
        .authenticate(&session, &Credentials::new(username, password))
        .await
    {
        Ok(outcome) if outcome.authenticated => {
            if outcome.is_low_confidence() {
                println!("[OK?] Authenticated (low confidence: no negative signals)");
            } else {
                println!("[OK] Authenticated");
            }
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            println!(
                "[REJECTED] {}",
                outcome.reason.as_deref().unwrap_or("unknown")
            );
            println!("--- response excerpt ---\n{}", outcome.response_excerpt);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_export(url: &str, out_path: &str, params: &[String]) -> ExitCode {
    let page_url = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Invalid URL: {}", e);
            return ExitCode::from(1);
        }
    };

    let mut request = ExportRequest::new(page_url);
    for param in params {
        match param.split_once('=') {
            Some((name, value)) => request = request.param(name, value),
            None => {
                eprintln!("Bad parameter (expected field=value): {}", param);
                return ExitCode::from(1);
            }
        }
    }

    let session = match Session::new() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to create session: {}", e);
            return ExitCode::from(1);
        }
    };

    match ReportExporter::new().fetch_export(&session, &request).await {
        Ok(artifact) => {
            println!(
                "Resolved {:?} artifact, {} bytes, from {}",
                artifact.kind,
                artifact.len(),
                artifact.source_url
            );
            if let Err(e) = artifact.write_to(out_path).await {
                eprintln!("Failed to write artifact: {}", e);
                return ExitCode::from(1);
            }
            println!("Saved to {}", out_path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            ExitCode::from(1)
        }
    }
}

fn describe(value: &Option<String>) -> String {
    match value {
        Some(v) if v.is_empty() => "<present, empty>".to_string(),
        Some(v) if v.chars().count() > 40 => {
            let head: String = v.chars().take(40).collect();
            format!("{}... ({} chars)", head, v.chars().count())
        }
        Some(v) => v.clone(),
        None => "<absent>".to_string(),
    }
}
