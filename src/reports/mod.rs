use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use posematch::config::JointSet;
use posematch::feedback::{FeedbackCounts, FeedbackLabel};
use posematch::features::triplets;
use posematch::recording::ReplayStats;
use posematch::reference::ReferenceSequence;

fn right_align(table: &mut Table, from: usize, to: usize) {
    for i in from..=to {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Per-angle min / mean / max over the whole reference.
pub fn print_reference_summary(reference: &ReferenceSequence, joint_set: JointSet) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Angle").add_attribute(Attribute::Bold),
        Cell::new("Joints"),
        Cell::new("Min"),
        Cell::new("Mean").fg(Color::Cyan),
        Cell::new("Max"),
    ]);
    right_align(&mut table, 2, 4);

    let n = reference.len().max(1) as f32;
    for (i, &(a, b, c)) in triplets(joint_set).iter().enumerate() {
        let column = reference.frames().iter().filter_map(|f| f.get(i).copied());
        let (min, max, sum) = column.fold((f32::INFINITY, f32::NEG_INFINITY, 0.0f32), |(lo, hi, s), v| {
            (lo.min(v), hi.max(v), s + v)
        });

        table.add_row(vec![
            Cell::new(format!("R{}", i)).add_attribute(Attribute::Bold),
            Cell::new(format!("{}-{}-{}", a, b, c)),
            Cell::new(format!("{:.3}", min)),
            Cell::new(format!("{:.3}", sum / n)).fg(Color::Cyan),
            Cell::new(format!("{:.3}", max)),
        ]);
    }
    println!("\n{}", table);
}

fn label_color(label: FeedbackLabel) -> Color {
    match label {
        FeedbackLabel::Perfect => Color::Green,
        FeedbackLabel::Cool => Color::Cyan,
        FeedbackLabel::Passable => Color::Yellow,
        FeedbackLabel::NotGoodEnough => Color::Red,
        FeedbackLabel::Unclear => Color::Grey,
    }
}

fn counts_cells(counts: &FeedbackCounts) -> Vec<Cell> {
    FeedbackLabel::RANKED
        .iter()
        .map(|&label| Cell::new(counts.get(label)).fg(label_color(label)))
        .collect()
}

/// One row per recording and horizon, one column per label.
pub fn print_replay_report(results: &[(String, ReplayStats)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("Recording").add_attribute(Attribute::Bold),
        Cell::new("Horizon"),
    ];
    header.extend(
        FeedbackLabel::RANKED
            .iter()
            .map(|&label| Cell::new(label.to_string()).fg(label_color(label))),
    );
    header.push(Cell::new("Frames"));
    header.push(Cell::new("Errors").fg(Color::Red));
    header.push(Cell::new("Mean").add_attribute(Attribute::Bold));
    table.add_row(header);
    right_align(&mut table, 2, 8);

    for (name, stats) in results {
        let horizons = [
            ("frame", &stats.summary.frame),
            ("rolling_average", &stats.summary.rolling_average),
            ("rolling_mode", &stats.summary.rolling_mode),
        ];
        for (i, (horizon, counts)) in horizons.iter().enumerate() {
            let first = i == 0;
            let mut row = vec![
                Cell::new(if first { name.as_str() } else { "" }).add_attribute(Attribute::Bold),
                Cell::new(*horizon),
            ];
            row.extend(counts_cells(counts));

            if first {
                row.push(Cell::new(stats.frames));
                row.push(Cell::new(stats.errors).fg(Color::Red));
                row.push(
                    Cell::new(match stats.mean_score {
                        Some(m) => format!("{:.3}", m),
                        None => "-".to_string(),
                    })
                    .add_attribute(Attribute::Bold),
                );
            }
            table.add_row(row);
        }
    }
    println!("\n{}", table);
}
