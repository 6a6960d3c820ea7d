//! Rendering a command result in its resolved format.

use super::OutputFormat;
use anyhow::{anyhow, Context as _, Result};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Human rendering for the `short` format.
pub trait Short {
    fn render_short(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Renders single-shot results to stdout.
#[derive(Debug, Clone)]
pub struct Printer {
    format: OutputFormat,
    template: Option<PathBuf>,
}

handlebars_helper!(json: |v: Json| v.to_string());

impl Printer {
    pub const fn new(format: OutputFormat, template: Option<PathBuf>) -> Self {
        Self { format, template }
    }

    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print `value` once, in the resolved format.
    pub fn print_data<T: Serialize + Short>(&self, value: &T) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_data(&mut out, value)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_data<W: Write, T: Serialize + Short>(&self, out: &mut W, value: &T) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, value)?;
                writeln!(out)?;
            }
            OutputFormat::Yaml => serde_yaml::to_writer(&mut *out, value)?,
            OutputFormat::Ndjson => match serde_json::to_value(value)? {
                serde_json::Value::Array(items) => {
                    for item in &items {
                        write_record(out, item)?;
                    }
                }
                other => write_record(out, &other)?,
            },
            OutputFormat::Short => value.render_short(out)?,
            OutputFormat::Template => self.write_template(out, value)?,
        }
        Ok(())
    }

    fn write_template<W: Write, T: Serialize>(&self, out: &mut W, value: &T) -> Result<()> {
        let path = self
            .template
            .as_deref()
            .ok_or_else(|| anyhow!("template output needs a template; pass --template <PATH>"))?;
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read template {}", path.display()))?;

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("json", Box::new(json));

        let rendered = registry
            .render_template(&source, value)
            .with_context(|| format!("cannot render template {}", path.display()))?;
        out.write_all(rendered.as_bytes())?;
        if !rendered.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Write one newline-delimited JSON record and flush it.
pub fn write_record<W: Write + ?Sized>(out: &mut W, value: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;

    #[derive(Serialize)]
    struct Hit {
        ip: &'static str,
        port: u16,
    }

    impl Short for Hit {
        fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
            writeln!(out, "{}:{}", self.ip, self.port)
        }
    }

    #[derive(Serialize)]
    #[serde(transparent)]
    struct Hits(Vec<Hit>);

    impl Short for Hits {
        fn render_short(&self, out: &mut dyn Write) -> io::Result<()> {
            self.0.iter().try_for_each(|h| h.render_short(out))
        }
    }

    fn render<T: Serialize + Short>(format: OutputFormat, value: &T) -> String {
        let mut buf = Vec::new();
        Printer::new(format, None).write_data(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn hits() -> Hits {
        Hits(vec![Hit { ip: "10.0.0.1", port: 22 }, Hit { ip: "10.0.0.2", port: 443 }])
    }

    #[test]
    fn test_json_is_pretty() {
        let out = render(OutputFormat::Json, &Hit { ip: "10.0.0.1", port: 22 });
        assert_eq!(out, "{\n  \"ip\": \"10.0.0.1\",\n  \"port\": 22\n}\n");
    }

    #[test]
    fn test_yaml() {
        let out = render(OutputFormat::Yaml, &Hit { ip: "10.0.0.1", port: 22 });
        assert_eq!(out, "ip: 10.0.0.1\nport: 22\n");
    }

    #[test]
    fn test_ndjson_splits_arrays() {
        let out = render(OutputFormat::Ndjson, &hits());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, [r#"{"ip":"10.0.0.1","port":22}"#, r#"{"ip":"10.0.0.2","port":443}"#]);
    }

    #[test]
    fn test_ndjson_single_object_is_one_line() {
        let out = render(OutputFormat::Ndjson, &Hit { ip: "10.0.0.1", port: 22 });
        assert_eq!(out, "{\"ip\":\"10.0.0.1\",\"port\":22}\n");
    }

    #[test]
    fn test_short_uses_command_rendering() {
        assert_eq!(render(OutputFormat::Short, &hits()), "10.0.0.1:22\n10.0.0.2:443\n");
    }

    #[test]
    fn test_template_renders_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{{{#each this}}}}{{{{ip}}}} {{{{json port}}}};{{{{/each}}}}").unwrap();

        let mut buf = Vec::new();
        Printer::new(OutputFormat::Template, Some(file.path().to_path_buf()))
            .write_data(&mut buf, &hits())
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "10.0.0.1 22;10.0.0.2 443;\n");
    }

    #[test]
    fn test_template_without_path_errors() {
        let mut buf = Vec::new();
        let err = Printer::new(OutputFormat::Template, None)
            .write_data(&mut buf, &hits())
            .unwrap_err();
        assert!(err.to_string().contains("--template"));
    }

    #[test]
    fn test_write_record_is_compact() {
        let mut buf = Vec::new();
        write_record(&mut buf, &json!({"a": [1, 2]})).unwrap();
        assert_eq!(buf, b"{\"a\":[1,2]}\n");
    }
}
