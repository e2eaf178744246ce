//! Terminal rendering for configuration, presets, previews and traffic.

use chaos_types::models::{
    HeaderFlag, RequestPreview, ThrottleField, CUSTOM_PRESET_ID, NETWORK_PRESETS,
};
use chaos_types::{MockRule, ProxyConfiguration, ProxyMode, StatusRule, TrafficLog};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

/// Multi-line summary of the scalar fields.
pub fn config_summary(config: &ProxyConfiguration, preset: &str) -> String {
    let mut out = Vec::new();
    out.push(format!("{}", "Routing:".cyan().bold()));
    out.push(format!("  Mode: {}", config.mode));
    match config.mode {
        ProxyMode::Split => {
            out.push(format!("  Frontend: {}", config.target_frontend));
            out.push(format!("  Backend: {}", config.target_backend));
        },
        ProxyMode::Unified => out.push(format!("  Target: {}", config.target_unified)),
    }
    out.push(format!("  Chaos routes: {}", config.chaos_routes.join(", ")));

    let label = if preset == CUSTOM_PRESET_ID { preset.yellow() } else { preset.green() };
    out.push(format!("{} {}", "Network:".cyan().bold(), label));
    for field in ThrottleField::ALL {
        out.push(format!("  {}: {}", field.wire_key(), config.throttle.get(field)));
    }

    out.push(format!("{}", "Faults:".cyan().bold()));
    let mode = if config.failure_mode.is_normal() {
        config.failure_mode.as_str().normal()
    } else {
        config.failure_mode.as_str().red()
    };
    out.push(format!("  Failure mode: {} ({})", mode, config.failure_mode.description()));
    let headers: Vec<String> = HeaderFlag::ALL
        .into_iter()
        .map(|flag| format!("{}={}", flag.wire_key(), config.header_rules.get(flag)))
        .collect();
    out.push(format!("  Headers: {}", headers.join(" ")));
    out.join("\n")
}

pub fn status_rules_table(rules: &[StatusRule]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Path", "Status", "Rate"]);
    for rule in rules {
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(display_pattern(&rule.path_pattern)),
            Cell::new(rule.status_code).fg(Color::Red),
            Cell::new(format!("{}%", rule.error_rate)),
        ]);
    }
    table
}

pub fn mock_rules_table(rules: &[MockRule]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Path", "Active", "Body"]);
    for rule in rules {
        let active = if rule.active {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(&rule.id),
            Cell::new(display_pattern(&rule.path_pattern)),
            active,
            Cell::new(truncate(&rule.body.replace('\n', " "), 48)),
        ]);
    }
    table
}

pub fn presets_table(current: Option<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Req ms", "Resp ms", "Up B/s", "Down B/s", "Jitter ms"]);
    for preset in &NETWORK_PRESETS {
        let id = if current == Some(preset.id) {
            Cell::new(format!("* {}", preset.id)).fg(Color::Green)
        } else {
            Cell::new(preset.id)
        };
        let t = preset.throttle;
        table.add_row(vec![
            id,
            Cell::new(preset.label),
            Cell::new(t.request_delay_ms),
            Cell::new(t.response_delay_ms),
            Cell::new(t.bandwidth_up_bps),
            Cell::new(t.bandwidth_down_bps),
            Cell::new(t.jitter_ms),
        ]);
    }
    table
}

pub fn traffic_table(logs: &[TrafficLog]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Time", "Method", "Path", "Status", "Duration", "Tamper"]);
    for log in logs {
        let status = if log.is_error() {
            Cell::new(log.status_label()).fg(Color::Red)
        } else {
            Cell::new(log.status_label()).fg(Color::Green)
        };
        let tamper = match log.tamper_label() {
            Some(label) => Cell::new(label).fg(Color::Yellow),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&log.timestamp),
            Cell::new(&log.method),
            Cell::new(truncate(&log.path, 60)),
            status,
            Cell::new(format!("{}ms", log.duration)),
            tamper,
        ]);
    }
    table
}

pub fn preview_summary(preview: &RequestPreview) -> String {
    let mut out = Vec::new();
    out.push(format!("{} {}", "Path:".cyan().bold(), preview.path));
    out.push(format!("  Forwarded to: {}", preview.target));
    if preview.chaos_route {
        out.push("  Chaos route: yes (delays, throttling and faults apply)".to_string());
    } else {
        out.push("  Chaos route: no".to_string());
    }

    if let Some(mock) = &preview.mock {
        out.push(format!("  Mocked by rule {}", mock.id.yellow()));
    }
    for candidate in &preview.status_candidates {
        out.push(format!(
            "  Rule {} injects {} with probability {:.1}%",
            candidate.rule.id,
            candidate.rule.status_code.to_string().red(),
            candidate.win_probability * 100.0
        ));
    }
    if !preview.status_candidates.is_empty() {
        out.push(format!(
            "  No injection: {:.1}%",
            preview.passthrough_probability * 100.0
        ));
    }
    if let Some(annotation) = &preview.annotation {
        out.push(format!("  Traffic log tag: {}", annotation));
    }
    out.join("\n")
}

fn display_pattern(pattern: &str) -> &str {
    if pattern.is_empty() {
        "(all paths)"
    } else {
        pattern
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(max_len).collect();
        result.push('…');
        result
    }
}
