//! Static dashboard report rendered with comfy-table

use comfy_table::{
    presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
};
use console::style;

use crate::pipeline::{
    ChargeHistogram, CleaningReport, CorrelationMatrix, DashboardView, FilterField,
    FilterSelection, GroupRate, KeyMetrics,
};
use crate::utils::{print_indented, print_info, print_section_header};

/// Width of the inline bars drawn next to rates and counts
const BAR_WIDTH: usize = 24;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn bar(fraction: f64) -> String {
    if !fraction.is_finite() {
        return String::new();
    }
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

fn rate_color(rate: f64) -> Color {
    if !rate.is_finite() {
        Color::DarkGrey
    } else if rate >= 0.4 {
        Color::Red
    } else if rate >= 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Headline metrics, whole table next to the current selection
pub fn metrics_table(overall: &KeyMetrics, selection: &KeyMetrics) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("All customers").add_attribute(Attribute::Bold),
        Cell::new("Selection").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("👥 Customers"),
        Cell::new(overall.customers).set_alignment(CellAlignment::Right),
        Cell::new(selection.customers).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("📉 Churn Rate"),
        Cell::new(overall.churn_rate_label()).set_alignment(CellAlignment::Right),
        Cell::new(selection.churn_rate_label())
            .fg(rate_color(selection.churn_rate))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("⏳ Average Tenure"),
        Cell::new(overall.avg_tenure_label()).set_alignment(CellAlignment::Right),
        Cell::new(selection.avg_tenure_label()).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("💵 Average Monthly Charge"),
        Cell::new(overall.avg_monthly_charge_label()).set_alignment(CellAlignment::Right),
        Cell::new(selection.avg_monthly_charge_label()).set_alignment(CellAlignment::Right),
    ]);

    table
}

/// Churn rate per category with an inline bar
pub fn group_rate_table(category_header: &str, rates: &[GroupRate]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(category_header).add_attribute(Attribute::Bold),
        Cell::new("Customers").add_attribute(Attribute::Bold),
        Cell::new("Churn Rate").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.category),
            Cell::new(rate.customers).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", rate.churn_rate))
                .fg(rate_color(rate.churn_rate))
                .set_alignment(CellAlignment::Right),
            Cell::new(bar(rate.churn_rate)).fg(rate_color(rate.churn_rate)),
        ]);
    }

    table
}

/// Histogram bins with churned and retained counts side by side
pub fn histogram_table(histogram: &ChargeHistogram) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(format!("{} range", histogram.column)).add_attribute(Attribute::Bold),
        Cell::new("Churned").add_attribute(Attribute::Bold),
        Cell::new("Retained").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    let max = histogram.max_count().max(1) as f64;
    for bin in &histogram.bins {
        let mut row = vec![
            Cell::new(format!("{:>7.2} – {:<7.2}", bin.lower, bin.upper)),
            Cell::new(bin.churned)
                .fg(Color::Red)
                .set_alignment(CellAlignment::Right),
            Cell::new(bin.retained)
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Right),
        ];
        row.push(Cell::new(format!(
            "{}\n{}",
            style(bar(bin.churned as f64 / max)).red(),
            style(bar(bin.retained as f64 / max)).cyan()
        )));
        table.add_row(row);
    }

    table
}

/// Annotated correlation heatmap
pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new("")];
    header.extend(
        matrix
            .columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (i, name) in matrix.columns.iter().enumerate() {
        let mut row = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        for j in 0..matrix.len() {
            let value = matrix.get(i, j);
            row.push(
                Cell::new(format!("{:.2}", value))
                    .fg(correlation_color(value))
                    .set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(row);
    }

    table
}

/// Diverging palette: blue for negative, red for positive
fn correlation_color(value: f64) -> Color {
    match value {
        v if !v.is_finite() => Color::DarkGrey,
        v if v >= 0.5 => Color::Red,
        v if v >= 0.1 => Color::DarkYellow,
        v if v <= -0.5 => Color::Blue,
        v if v <= -0.1 => Color::Cyan,
        _ => Color::White,
    }
}

/// What the cleaning pass did to the raw table
pub fn cleaning_table(report: &CleaningReport) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Cleaning Step").add_attribute(Attribute::Bold),
        Cell::new("Result").add_attribute(Attribute::Bold),
    ]);

    let median = report
        .total_charges_median
        .map(|m| format!("{:.2}", m))
        .unwrap_or_else(|| "n/a".to_string());
    table.add_row(vec![
        Cell::new("🧮 TotalCharges imputed"),
        Cell::new(format!("{} (median {})", report.total_charges_imputed, median)),
    ]);
    table.add_row(vec![
        Cell::new("🎯 Churn labels"),
        Cell::new(format!(
            "{} churned / {} retained",
            report.churn_events, report.churn_non_events
        )),
    ]);
    table.add_row(vec![
        Cell::new("❓ Unmapped labels"),
        Cell::new(report.churn_unmapped).fg(if report.churn_unmapped == 0 {
            Color::White
        } else {
            Color::Yellow
        }),
    ]);
    if report.dropped_rows > 0 {
        table.add_row(vec![
            Cell::new("🗑️  Rows dropped"),
            Cell::new(report.dropped_rows).fg(Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("🪪 customerID dropped"),
        Cell::new(if report.identifier_dropped { "yes" } else { "not present" }),
    ]);

    table
}

/// Describe the active filters, one line per field
pub fn selection_lines(selection: &FilterSelection) -> Vec<String> {
    FilterField::ALL
        .iter()
        .map(|field| {
            let values: Vec<&str> = selection
                .selected(*field)
                .map(|set| set.iter().map(String::as_str).collect())
                .unwrap_or_default();
            let shown = if values.is_empty() {
                "(none)".to_string()
            } else {
                values.join(", ")
            };
            format!("{}: {}", field.label(), shown)
        })
        .collect()
}

/// Print the cleaning summary
pub fn display_cleaning(report: &CleaningReport) {
    print_section_header("Data Cleaning");
    print_indented(&cleaning_table(report).to_string());
    if !report.raw_missing.is_empty() {
        for (column, ratio) in &report.raw_missing {
            print_info(&format!(
                "{} had {:.1}% empty cells before cleaning",
                column,
                ratio * 100.0
            ));
        }
    }
}

/// Print every dashboard panel
pub fn display_dashboard(view: &DashboardView, selection: &FilterSelection) {
    print_section_header("Filters");
    for line in selection_lines(selection) {
        println!("      {} {}", style("•").dim(), line);
    }

    print_section_header("Key Metrics");
    print_indented(&metrics_table(&view.overall, &view.selection).to_string());

    if view.matched_rows() == 0 {
        print_info("No customers match the current filters");
    }

    print_section_header("Churn by Contract Type");
    print_indented(&group_rate_table("Contract", &view.churn_by_contract).to_string());

    print_section_header("Monthly Charges Distribution by Churn");
    print_indented(&histogram_table(&view.monthly_charges).to_string());

    print_section_header("Churn Rate by Tenure");
    print_indented(&group_rate_table("Tenure (months)", &view.churn_by_tenure).to_string());

    print_section_header("Correlation Between Features");
    print_indented(&correlation_table(&view.correlation).to_string());

    print_section_header("Churn by Internet Service");
    print_indented(
        &group_rate_table("Internet Service", &view.churn_by_internet_service).to_string(),
    );
}
