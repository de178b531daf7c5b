//! Text report rendering
//!
//! Renders extraction results as ASCII tables. Every function returns the
//! text; printing is left to the caller.

use pdu_metadata::{CompuMethodEntry, CycleTime, PduMap, PduMetadata, ServiceMap, SignalCompuMethods};
use std::fmt::Write;

const BANNER: &str = "═══════════════════════════════════════════════";

/// Section heading framed by banner lines
pub fn heading(title: &str) -> String {
    format!("{}\n  {}\n{}\n", BANNER, title, BANNER)
}

/// Column-aligned ASCII table
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row; missing cells render empty, extra cells are dropped
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut row: Vec<String> = cells.into_iter().map(|c| c.to_string()).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let separator = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let separator = format!("+{}+\n", separator);

        let mut out = String::new();
        out.push_str(&separator);
        out.push_str(&render_line(&self.headers, &widths));
        out.push_str(&separator);
        for row in &self.rows {
            out.push_str(&render_line(row, &widths));
        }
        out.push_str(&separator);
        out
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width - cell.chars().count();
        let _ = write!(line, " {}{} |", cell, " ".repeat(padding));
    }
    line.push('\n');
    line
}

/// Service interfaces keyed by normalized name
pub fn render_services(services: &ServiceMap) -> String {
    let mut table = TextTable::new(["Normalized Key", "Service Interface", "Service ID", "Event IDs"]);
    for (key, service) in services {
        let event_ids = service.event_ids_joined();
        table.add_row([
            key.as_str(),
            service.interface_name.as_str(),
            service.service_id.as_str(),
            event_ids.as_str(),
        ]);
    }

    format!("{}Found {} service interfaces.\n", table.render(), services.len())
}

/// One block per PDU with its signal table
pub fn render_pdus(pdus: &PduMap) -> String {
    let mut out = String::new();

    for (name, pdu) in pdus {
        let _ = writeln!(out, "PDU: {}", name);
        let _ = writeln!(out, "  Length:        {} bits", pdu.length);
        let _ = writeln!(out, "  Cycle Time:    {} seconds", pdu.cycle_time);
        let _ = writeln!(out, "  Total Signals: {}", pdu.total_signals);

        if !pdu.signals.is_empty() {
            let mut table = TextTable::new([
                "Signal Name",
                "Value",
                "Byte Order",
                "Start Bit",
                "Length",
                "Computation Method (LowerLimit.Name)",
            ]);
            for (signal_name, layout) in &pdu.signals {
                table.add_row([
                    signal_name.clone(),
                    layout.value.to_string(),
                    layout.byte_order.to_string(),
                    layout.start_bit.to_string(),
                    layout.length.clone(),
                    layout.compu_method.clone(),
                ]);
            }
            out.push_str(&table.render());
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Found {} PDUs.", pdus.len());
    out
}

/// How each PDU's cycle time was derived from its name
pub fn render_cycle_times(cycle_times: &[(String, CycleTime)]) -> String {
    let mut table = TextTable::new(["PDU Name", "Extracted Number", "Computed Cycle Time (s)"]);
    for (name, cycle_time) in cycle_times {
        table.add_row([name, &cycle_time.extracted, &cycle_time.seconds]);
    }

    format!(
        "Cycle time = trailing 2-4 digit number of the PDU name / 1000; 0.0 when absent.\n{}",
        table.render()
    )
}

/// Compu-scale entries followed by the per-signal compu-method strings
pub fn render_compu_methods(entries: &[CompuMethodEntry], signals: &SignalCompuMethods) -> String {
    let mut scales = TextTable::new(["Compu Method", "Raw Value", "Hex Value", "Description"]);
    for entry in entries {
        scales.add_row([&entry.method_name, &entry.raw_value, &entry.hex_value, &entry.description]);
    }

    let mut per_signal = TextTable::new(["Signal Name", "Computation Method (LowerLimit.Name)"]);
    for (signal_name, compu_method) in signals.iter() {
        per_signal.add_row([signal_name, compu_method]);
    }

    format!(
        "{}Found {} compu-scale entries.\n\n{}Resolved {} signals.\n",
        scales.render(),
        entries.len(),
        per_signal.render(),
        signals.len()
    )
}

/// One line per correlated message
pub fn render_summary(metadata: &PduMetadata) -> String {
    let mut table = TextTable::new([
        "PDU Name",
        "Service Interface",
        "Service ID",
        "Event IDs",
        "Length",
        "Cycle Time",
        "Signals",
    ]);
    for (name, message) in &metadata.messages {
        table.add_row([
            name.clone(),
            message.service_interface.clone(),
            message.service_id.clone(),
            message.event_ids.clone(),
            message.length.clone(),
            message.cycle_time.clone(),
            message.total_signals.to_string(),
        ]);
    }

    let matched = metadata
        .messages
        .values()
        .filter(|message| message.service_interface != "N/A")
        .count();

    format!(
        "{}{} messages, {} matched to a service interface.\n",
        table.render(),
        metadata.len(),
        matched
    )
}
