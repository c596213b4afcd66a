use anyhow::Result;
use std::io::Write;

use crate::application::{BalanceReport, SettlementResult};
use crate::domain::{format_amount, Transfer};

/// Rendered when a settlement produces no transfers.
pub const SETTLED_MESSAGE: &str = "All balances are settled!";

/// Heading placed above the transfer lines in a settlement message.
pub const SETTLEMENT_HEADER: &str = "Settlement Recommendations:";

/// One line per transfer: "{from} pays {to} {currency} {amount}".
/// A single settled line when there is nothing to pay.
pub fn render_lines(transfers: &[Transfer]) -> Vec<String> {
    if transfers.is_empty() {
        return vec![SETTLED_MESSAGE.to_string()];
    }
    transfers.iter().map(Transfer::to_string).collect()
}

/// Full chat-style message: header, blank line, then one line per transfer.
pub fn render_message(transfers: &[Transfer]) -> String {
    if transfers.is_empty() {
        return SETTLED_MESSAGE.to_string();
    }
    let mut message = format!("{}\n\n", SETTLEMENT_HEADER);
    for line in render_lines(transfers) {
        message.push_str(&line);
        message.push('\n');
    }
    message
}

/// "{user}: {currency} {balance}" lines, grouped by currency.
pub fn render_balances(report: &BalanceReport) -> Vec<String> {
    report
        .currencies
        .iter()
        .flat_map(|group| {
            group.balances.iter().map(move |entry| {
                format!(
                    "{}: {} {}",
                    entry.user,
                    group.currency,
                    format_amount(entry.balance)
                )
            })
        })
        .collect()
}

/// Exporter for writing a settlement to various formats
pub struct Exporter<'a> {
    result: &'a SettlementResult,
}

impl<'a> Exporter<'a> {
    pub fn new(result: &'a SettlementResult) -> Self {
        Self { result }
    }

    /// Export transfers to CSV. The header is always written.
    pub fn export_transfers_csv<W: Write>(&self, writer: W) -> Result<usize> {
        write_transfers_csv(&self.result.transfers, writer)
    }

    /// Export net balances to CSV, grouped by currency
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        write_balances_csv(&BalanceReport::from_sheet(&self.result.balances), writer)
    }

    /// Export balances and transfers as a JSON report. Amounts keep full precision.
    pub fn export_report_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.result.report())?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write the human-readable lines, one per row.
    pub fn export_text<W: Write>(&self, mut writer: W) -> Result<usize> {
        let lines = render_lines(&self.result.transfers);
        for line in &lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(self.result.transfers.len())
    }
}

/// Write transfers as `Debtor,Creditor,Currency,Amount` rows, amounts to two
/// decimal places regardless of currency.
pub fn write_transfers_csv<W: Write>(transfers: &[Transfer], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["Debtor", "Creditor", "Currency", "Amount"])?;

    let mut count = 0;
    for transfer in transfers {
        let amount = transfer.display_amount();
        csv_writer.write_record([
            transfer.from.as_str(),
            transfer.to.as_str(),
            transfer.currency.as_str(),
            amount.as_str(),
        ])?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

/// Write a balance report as `User,Currency,Balance` rows.
pub fn write_balances_csv<W: Write>(report: &BalanceReport, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["User", "Currency", "Balance"])?;

    let mut count = 0;
    for group in &report.currencies {
        for entry in &group.balances {
            let balance = format_amount(entry.balance);
            csv_writer.write_record([
                entry.user.as_str(),
                group.currency.as_str(),
                balance.as_str(),
            ])?;
            count += 1;
        }
    }

    csv_writer.flush()?;
    Ok(count)
}
