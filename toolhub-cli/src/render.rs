//! Text and JSON output for each command

use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use toolhub_plugin::{Capability, CapabilitySummary, Category, LogLevel};

use crate::host::Host;

/// Navigation list: available tools sorted by name
pub fn list(host: &Host, category: Option<Category>, json: bool, out: &mut impl Write) -> Result<()> {
    let summaries: Vec<CapabilitySummary> = host
        .registry
        .summaries()
        .into_iter()
        .filter(|summary| summary.available)
        .filter(|summary| category.is_none_or(|c| summary.descriptor.category == c))
        .collect();

    if json {
        let rendered = serde_json::to_string_pretty(&summaries).context("Failed to serialize tool list")?;
        writeln!(out, "{}", rendered)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(out, "{}", host.text("nav.empty", &[]))?;
        return Ok(());
    }

    writeln!(out, "{}", host.text("nav.header", &[]).bold())?;
    let width = summaries
        .iter()
        .map(|summary| summary.descriptor.name.chars().count())
        .max()
        .unwrap_or(0);

    for summary in &summaries {
        let descriptor = &summary.descriptor;
        writeln!(
            out,
            "  {:<width$}  {:<17}  {}",
            descriptor.name,
            descriptor.category.as_str(),
            descriptor.id.dimmed(),
            width = width
        )?;
    }

    Ok(())
}

/// Toolbar, content and version line of one tool.
///
/// Returns `false` when no tool has that id.
pub fn show(host: &Host, id: &str, out: &mut impl Write) -> Result<bool> {
    let Some(capability) = host.registry.get(id) else {
        return Ok(false);
    };

    write_capability(host, capability.as_ref(), out)?;
    Ok(true)
}

fn write_capability(host: &Host, capability: &dyn Capability, out: &mut impl Write) -> Result<()> {
    let descriptor = capability.descriptor();

    if !capability.is_available() {
        writeln!(out, "{}", host.text("nav.unavailable", &[descriptor.name.as_str()]).yellow())?;
        return Ok(());
    }

    if let Some(toolbar) = capability.toolbar().render_text() {
        writeln!(out, "{}", toolbar)?;
        writeln!(out)?;
    }

    write!(out, "{}", capability.content().render_text())?;

    let version = descriptor.version.to_string();
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        host.text("capability.version", &[version.as_str(), descriptor.author.as_str()])
            .dimmed()
    )?;
    Ok(())
}

/// Startup report plus any warnings tools logged while starting
pub fn status(host: &Host, out: &mut impl Write) -> Result<()> {
    let report = &host.report;

    writeln!(out, "{}", host.text("status.header", &[]).bold())?;

    let registered = report.registered.len().to_string();
    writeln!(out, "{}", host.text("status.registered", &[registered.as_str()]))?;
    for id in &report.registered {
        writeln!(out, "  {} {}", "✓".green(), id)?;
    }

    if !report.disabled.is_empty() {
        let disabled = report.disabled.len().to_string();
        writeln!(out, "{}", host.text("status.disabled", &[disabled.as_str()]))?;
        for id in &report.disabled {
            writeln!(out, "  - {}", id)?;
        }
    }

    if !report.failures.is_empty() {
        let failed = report.failures.len().to_string();
        writeln!(out, "{}", host.text("status.failed", &[failed.as_str()]))?;
        for failure in &report.failures {
            writeln!(out, "  {} {}: {}", "✗".red(), failure.id, failure.error)?;
        }
    }

    if let Some(ref error) = report.source_error {
        writeln!(out, "{}", host.text("status.source_error", &[error.as_str()]).red())?;
    }

    for record in host.records.records() {
        let marker = match record.level {
            LogLevel::Warn => "warn".yellow(),
            LogLevel::Error => "error".red(),
            LogLevel::Debug | LogLevel::Info => continue,
        };
        match record.cause {
            Some(ref cause) => writeln!(out, "  [{}] {}: {}", marker, record.message, cause)?,
            None => writeln!(out, "  [{}] {}", marker, record.message)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolhub_config::ToolhubConfig;
    use toolhub_plugin::{
        CapabilityDescriptor, CapabilityVersion, Cleanup, ExecutionContext, Panel, PluginError, PluginResult,
        StaticCapabilitySource, Toolbar,
    };
    use toolhub_plugins::{builtin_source, HostDiagnosticsCapability, ServerConfigurationCapability};

    struct Unreachable(CapabilityDescriptor);

    impl Capability for Unreachable {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.0
        }
        fn initialize(&mut self, _context: std::sync::Arc<dyn ExecutionContext>) -> PluginResult<()> {
            Err(PluginError::initialization_failed(self.0.id.clone(), "backend unreachable"))
        }
        fn is_available(&self) -> bool {
            false
        }
        fn cleanup(&self) -> Cleanup {
            Cleanup::NotNeeded
        }
        fn content(&self) -> Panel {
            Panel::new("unused")
        }
        fn toolbar(&self) -> Toolbar {
            Toolbar::None
        }
    }

    fn unreachable() -> Box<dyn Capability> {
        Box::new(Unreachable(CapabilityDescriptor::new(
            "toolhub.unreachable",
            "Unreachable",
            CapabilityVersion::new(0, 1, 0),
            "",
            "",
            Category::Tool,
        )))
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn builtin_host() -> Host {
        Host::start(&ToolhubConfig::default(), &builtin_source())
    }

    #[test]
    fn test_list_sorted_by_name() {
        let host = builtin_host();
        let text = render(|out| list(&host, None, false, out));

        let diagnostics = text.find("Host Diagnostics").unwrap();
        let server = text.find("Server Configuration").unwrap();
        assert!(text.starts_with("Tools\n"));
        assert!(diagnostics < server);
    }

    #[test]
    fn test_list_filtered_and_json() {
        let host = builtin_host();
        let json = render(|out| list(&host, Some(Category::Monitoring), true, out));

        let parsed: Vec<CapabilitySummary> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].descriptor.id, HostDiagnosticsCapability::ID);
    }

    #[test]
    fn test_list_empty() {
        let host = Host::start(&ToolhubConfig::default(), &StaticCapabilitySource::new());
        assert_eq!(render(|out| list(&host, None, false, out)), "No tools available\n");
    }

    #[test]
    fn test_show() {
        let host = builtin_host();
        let mut found = false;
        let text = render(|out| {
            found = show(&host, ServerConfigurationCapability::ID, out)?;
            Ok(())
        });

        assert!(found);
        assert!(text.starts_with("[ Save ] [ Reset ]\n\nServer Configuration\n"));
        assert!(text.ends_with("Version 1.0.0 by Toolhub Team\n"));

        let mut out = Vec::new();
        assert!(!show(&host, "missing", &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_status_reports_failures() {
        let source = builtin_source().with_factory(unreachable);
        let mut config = ToolhubConfig::default();
        config.plugins.disabled = vec![HostDiagnosticsCapability::ID.to_string()];

        let host = Host::start(&config, &source);
        let text = render(|out| status(&host, out));

        assert!(text.starts_with("Startup report\n"));
        assert!(text.contains("Registered: 1\n"));
        assert!(text.contains("Disabled: 1\n"));
        assert!(text.contains("Failed: 1\n"));
        assert!(text.contains("toolhub.unreachable: Capability 'toolhub.unreachable' initialization failed: backend unreachable"));
        assert!(text.contains("[error] Failed to load capability 'Unreachable' (toolhub.unreachable)"));
    }
}
