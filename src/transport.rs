use crate::protocol::Intent;
use anyhow::{Context, Result};
use std::io::Write;

/// Outbound channel from the view to the host
pub trait Transport {
    fn post(&mut self, intent: &Intent) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn post(&mut self, intent: &Intent) -> Result<()> {
        (**self).post(intent)
    }
}

/// Keeps every posted intent in memory. Used by tests and by callers that
/// want to inspect what the view would have sent.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pub sent: Vec<Intent>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything posted so far
    pub fn take(&mut self) -> Vec<Intent> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    fn post(&mut self, intent: &Intent) -> Result<()> {
        self.sent.push(intent.clone());
        Ok(())
    }
}

/// Writes each intent as a single JSON line, flushing after every message
pub struct JsonLinesTransport<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn post(&mut self, intent: &Intent) -> Result<()> {
        let line = serde_json::to_string(intent)?;
        writeln!(self.out, "{}", line)
            .with_context(|| format!("writing {} intent", intent.command()))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<W: Write> JsonLinesTransport<W> {
        fn into_inner(self) -> W {
            self.out
        }
    }

    #[test]
    fn memory_transport_records_in_order() {
        let mut t = MemoryTransport::new();
        t.post(&Intent::Refresh).unwrap();
        t.post(&Intent::Export).unwrap();
        assert_eq!(t.take(), vec![Intent::Refresh, Intent::Export]);
        assert!(t.sent.is_empty());
    }

    #[test]
    fn json_lines_transport_writes_one_line_per_intent() {
        let mut t = JsonLinesTransport::new(Vec::new());
        t.post(&Intent::Refresh).unwrap();
        t.post(&Intent::ViewAnnotation { id: "a\"b".into() }).unwrap();
        let out = String::from_utf8(t.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"command":"refresh"}"#);
        assert_eq!(lines[1], r#"{"command":"viewAnnotation","id":"a\"b"}"#);
    }
}
