use crate::cli::PlanArgs;
use crate::config::build_config;
use crate::error::Result;
use prospr::core::assembly::grid::GridPlanner;
use prospr::engine::scheduler::{CropPlan, max_offset_pairs, plan_crops, tile};
use tracing::info;

pub fn run(args: PlanArgs) -> Result<()> {
    let config = build_config(&args.assembly)?;
    info!(
        length = args.length,
        window_size = config.window_size,
        num_offsets = config.num_offsets,
        "Planning crops."
    );

    let mut rng = config.rng();
    let plan = plan_crops(args.length, config.window_size, config.num_offsets, &mut rng);
    info!(windows = plan.len(), "Plan ready.");

    print!("{}", render(&plan, args.length, args.show_windows));
    Ok(())
}

fn render(plan: &CropPlan, length: usize, show_windows: bool) -> String {
    let size = plan.window_size;
    let offsets: Vec<String> = GridPlanner::new(size)
        .coverage_offsets(length)
        .iter()
        .map(|o| o.to_string())
        .collect();

    let mut lines = vec![
        format!(
            "Domain length {} with {}x{} windows (margin {})",
            length,
            size,
            size,
            size / 2
        ),
        format!("Coverage offsets: [{}]", offsets.join(", ")),
        format!(
            "Offset pairs: {} of at most {} ({} from coverage offsets)",
            plan.offset_pairs.len(),
            max_offset_pairs(length, size),
            plan.coverage_pairs
        ),
    ];
    for (index, &pair) in plan.offset_pairs.iter().enumerate() {
        lines.push(format!(
            "  {:>3}. ({}, {}) -> {} windows",
            index + 1,
            pair.0,
            pair.1,
            tile(pair, length, size).count()
        ));
    }
    lines.push(format!("Windows: {}", plan.len()));

    if show_windows {
        lines.extend(plan.windows.iter().map(|w| format!("  {}", w)));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AssemblyArgs;

    fn seeded_plan(length: usize, window_size: usize, num_offsets: usize) -> CropPlan {
        let config = build_config(&AssemblyArgs {
            window_size: Some(window_size),
            num_offsets: Some(num_offsets),
            seed: Some(0),
            ..Default::default()
        })
        .unwrap();
        plan_crops(length, window_size, num_offsets, &mut config.rng())
    }

    #[test]
    fn render_summarizes_a_single_window_plan() {
        let plan = seeded_plan(40, 64, 1);
        let text = render(&plan, 40, true);

        assert!(text.contains("Domain length 40 with 64x64 windows (margin 32)"));
        assert!(text.contains("Coverage offsets: [32]"));
        assert!(text.contains("Offset pairs: 1 of at most"));
        assert!(text.contains("(32, 32) -> 1 windows"));
        assert!(text.contains("Windows: 1"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn window_listing_is_optional() {
        let plan = seeded_plan(100, 16, 2);
        let brief = render(&plan, 100, false);
        let full = render(&plan, 100, true);

        assert_eq!(full.lines().count(), brief.lines().count() + plan.len());
    }
}
