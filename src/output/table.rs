use comfy_table::Color;

use crate::cli::SortOrder;
use crate::core::{
    ChargePeriodStats, ClientStats, DestinationStats, Period, TripPeriodStats,
};
use crate::output::format::{
    create_styled_table, format_amount, format_distance, format_opt_amount, header_cell,
    right_cell, styled_cell,
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) breakdown: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SummaryOptions {
    pub(crate) processed: usize,
    pub(crate) skipped: usize,
}

/// Print the record-count summary line shown under every table.
pub(crate) fn print_summary_line(summary: SummaryOptions) {
    println!(
        "\n  {} records processed ({} incomplete rows skipped)\n",
        summary.processed, summary.skipped
    );
}

fn period_heading(period: Period) -> (&'static str, &'static str) {
    match period {
        Period::Weekly => ("Week", "Weekly"),
        Period::Monthly => ("Month", "Monthly"),
        Period::Yearly => ("Year", "Yearly"),
    }
}

fn ordered<T>(rows: &[T], order: SortOrder) -> Vec<&T> {
    match order {
        SortOrder::Asc => rows.iter().collect(),
        SortOrder::Desc => rows.iter().rev().collect(),
    }
}

/// Sum of optional per-row figures; `None` when no row carries one.
fn opt_sum(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().reduce(|a, b| a + b)
}

fn print_charge_breakdown_table(
    stats: &[ChargePeriodStats],
    period: Period,
    options: TableOptions,
) {
    let (label, _) = period_heading(period);
    let c = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell(label, c),
        header_cell("Tariff", c),
        header_cell("Charges", c),
        header_cell("kWh", c),
        header_cell("Cost (€)", c),
    ]);

    let mut total_count = 0usize;
    let mut total_kwh = 0.0;
    let mut total_cost = 0.0;

    for bucket in ordered(stats, options.order) {
        for (i, (tariff, totals)) in bucket.tariffs.iter().enumerate() {
            table.add_row(vec![
                styled_cell(if i == 0 { bucket.period.as_str() } else { "" }, None, false),
                styled_cell(tariff.label(), None, false),
                right_cell(&totals.count.to_string(), None, false),
                right_cell(&format_amount(totals.kwh), None, false),
                right_cell(&format_amount(totals.cost), None, false),
            ]);
        }
        total_count += bucket.count;
        total_kwh += bucket.kwh;
        total_cost += bucket.cost;
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let green = if c { Some(Color::Green) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        styled_cell("", None, false),
        right_cell(&total_count.to_string(), cyan, true),
        right_cell(&format_amount(total_kwh), cyan, true),
        right_cell(&format_amount(total_cost), green, true),
    ]);

    println!("{table}");
}

pub(crate) fn print_charge_table(
    stats: &[ChargePeriodStats],
    period: Period,
    summary: SummaryOptions,
    options: TableOptions,
) {
    let (label, title) = period_heading(period);
    println!("\n  {title} Charging\n");

    if options.breakdown {
        print_charge_breakdown_table(stats, period, options);
        print_summary_line(summary);
        return;
    }

    let c = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell(label, c),
        header_cell("Charges", c),
        header_cell("kWh", c),
        header_cell("Fast kWh", c),
        header_cell("Cost (€)", c),
        header_cell("Distance (km)", c),
        header_cell("kWh/100km", c),
        header_cell("€/100km", c),
        header_cell("Savings (€)", c),
        header_cell("CO₂ (kg)", c),
    ]);

    let mut total_count = 0usize;
    let mut total_kwh = 0.0;
    let mut total_fast_kwh = 0.0;
    let mut total_cost = 0.0;
    let mut total_distance = 0.0;

    for bucket in ordered(stats, options.order) {
        table.add_row(vec![
            styled_cell(&bucket.period, None, false),
            right_cell(&bucket.count.to_string(), None, false),
            right_cell(&format_amount(bucket.kwh), None, false),
            right_cell(&format_amount(bucket.fast.kwh), None, false),
            right_cell(&format_amount(bucket.cost), None, false),
            right_cell(&format_distance(bucket.distance), None, false),
            right_cell(&format_opt_amount(bucket.consumption_kwh_100km), None, false),
            right_cell(&format_opt_amount(bucket.cost_per_100km), None, false),
            right_cell(&format_opt_amount(bucket.savings), None, false),
            right_cell(&format_opt_amount(bucket.co2_saved_kg), None, false),
        ]);
        total_count += bucket.count;
        total_kwh += bucket.kwh;
        total_fast_kwh += bucket.fast.kwh;
        total_cost += bucket.cost;
        total_distance += bucket.distance;
    }

    let total_savings = opt_sum(stats.iter().map(|b| b.savings));
    let total_co2 = opt_sum(stats.iter().map(|b| b.co2_saved_kg));

    let cyan = if c { Some(Color::Cyan) } else { None };
    let green = if c { Some(Color::Green) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&total_count.to_string(), cyan, true),
        right_cell(&format_amount(total_kwh), cyan, true),
        right_cell(&format_amount(total_fast_kwh), cyan, true),
        right_cell(&format_amount(total_cost), green, true),
        right_cell(&format_distance(total_distance), cyan, true),
        styled_cell("", None, false),
        styled_cell("", None, false),
        right_cell(&format_opt_amount(total_savings), green, true),
        right_cell(&format_opt_amount(total_co2), cyan, true),
    ]);

    println!("{table}");
    print_summary_line(summary);
}

pub(crate) fn print_trip_table(
    stats: &[TripPeriodStats],
    period: Period,
    summary: SummaryOptions,
    options: TableOptions,
) {
    let (label, title) = period_heading(period);
    println!("\n  {title} Trips\n");

    let c = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell(label, c),
        header_cell("Trips", c),
        header_cell("Distance (km)", c),
        header_cell("Cost (€)", c),
        header_cell("Savings (€)", c),
        header_cell("Billed (€)", c),
    ]);

    let mut total_count = 0usize;
    let mut total_distance = 0.0;
    let mut total_cost = 0.0;
    let mut total_savings = 0.0;
    let mut total_billed = 0.0;

    for bucket in ordered(stats, options.order) {
        table.add_row(vec![
            styled_cell(&bucket.period, None, false),
            right_cell(&bucket.count.to_string(), None, false),
            right_cell(&format_distance(bucket.distance), None, false),
            right_cell(&format_amount(bucket.cost), None, false),
            right_cell(&format_amount(bucket.savings), None, false),
            right_cell(&format_amount(bucket.billed), None, false),
        ]);
        total_count += bucket.count;
        total_distance += bucket.distance;
        total_cost += bucket.cost;
        total_savings += bucket.savings;
        total_billed += bucket.billed;
    }

    let cyan = if c { Some(Color::Cyan) } else { None };
    let green = if c { Some(Color::Green) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&total_count.to_string(), cyan, true),
        right_cell(&format_distance(total_distance), cyan, true),
        right_cell(&format_amount(total_cost), cyan, true),
        right_cell(&format_amount(total_savings), green, true),
        right_cell(&format_amount(total_billed), green, true),
    ]);

    println!("{table}");
    print_summary_line(summary);
}

pub(crate) fn print_client_table(
    stats: &[ClientStats],
    summary: SummaryOptions,
    use_color: bool,
) {
    println!("\n  Billing by Client\n");

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Client", use_color),
        header_cell("Trips", use_color),
        header_cell("Distance (km)", use_color),
        header_cell("Billed (€)", use_color),
    ]);

    let mut total_count = 0usize;
    let mut total_distance = 0.0;
    let mut total_billed = 0.0;

    for row in stats {
        table.add_row(vec![
            styled_cell(&row.client, None, false),
            right_cell(&row.count.to_string(), None, false),
            right_cell(&format_distance(row.distance), None, false),
            right_cell(&format_amount(row.billed), None, false),
        ]);
        total_count += row.count;
        total_distance += row.distance;
        total_billed += row.billed;
    }

    let cyan = if use_color { Some(Color::Cyan) } else { None };
    let green = if use_color { Some(Color::Green) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&total_count.to_string(), cyan, true),
        right_cell(&format_distance(total_distance), cyan, true),
        right_cell(&format_amount(total_billed), green, true),
    ]);

    println!("{table}");
    print_summary_line(summary);
}

pub(crate) fn print_destination_table(
    stats: &[DestinationStats],
    summary: SummaryOptions,
    use_color: bool,
) {
    println!("\n  Trips by Destination\n");

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Destination", use_color),
        header_cell("Trips", use_color),
        header_cell("Distance (km)", use_color),
        header_cell("Avg (km)", use_color),
    ]);

    let mut total_count = 0usize;
    let mut total_distance = 0.0;

    for row in stats {
        table.add_row(vec![
            styled_cell(&row.destination, None, false),
            right_cell(&row.count.to_string(), None, false),
            right_cell(&format_distance(row.distance), None, false),
            right_cell(&format_distance(row.avg_distance), None, false),
        ]);
        total_count += row.count;
        total_distance += row.distance;
    }

    let cyan = if use_color { Some(Color::Cyan) } else { None };
    table.add_row(vec![
        styled_cell("TOTAL", cyan, true),
        right_cell(&total_count.to_string(), cyan, true),
        right_cell(&format_distance(total_distance), cyan, true),
        styled_cell("", None, false),
    ]);

    println!("{table}");
    print_summary_line(summary);
}
