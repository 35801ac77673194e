//! Property tests over generated documents.

use std::collections::HashMap;

use proptest::prelude::*;

use screenc::{ScreenBuilder, config::AppConfig};

/// Checks that every guarded macro is undefined exactly once before its
/// name is guarded again, and that nothing stays defined at the end.
fn assert_guards_balanced(header: &str) {
    let mut open: HashMap<&str, usize> = HashMap::new();
    for line in header.lines() {
        if let Some(name) = line.strip_prefix("#ifndef ") {
            let count = open.entry(name).or_default();
            assert_eq!(*count, 0, "{name} guarded twice");
            *count += 1;
        } else if let Some(name) = line.strip_prefix("#undef ") {
            let count = open.entry(name).or_default();
            assert_eq!(*count, 1, "{name} undefined without a guard");
            *count -= 1;
        }
    }
    let leaked: Vec<&&str> = open.iter().filter(|(_, n)| **n != 0).map(|(k, _)| k).collect();
    assert!(leaked.is_empty(), "never undefined: {leaked:?}");
}

/// Returns the tab-indented entries between `start` and `end` lines.
fn table<'a>(header: &'a str, start: &str, end: &str, entry: &str) -> Vec<&'a str> {
    let mut rows = Vec::new();
    let mut inside = false;
    for line in header.lines() {
        if line == start {
            inside = true;
        } else if line == end {
            inside = false;
        } else if inside && let Some(row) = line.strip_prefix(entry) {
            rows.push(row);
        }
    }
    rows
}

fn keypad(canvases: &[Vec<(usize, Option<&str>)>]) -> String {
    let mut source = String::from("<Screens>\n");
    for (index, keys) in canvases.iter().enumerate() {
        source.push_str(&format!(
            "<Canvas Name=\"pad{index}\" Width=\"32\" Height=\"8\" ColorDepth=\"Color8bpp\"{}>\n",
            if index % 2 == 0 { " Type=\"Keys\"" } else { "" }
        ));
        for (key, (column, group)) in keys.iter().enumerate() {
            source.push_str(&format!(
                "  <Rectangle Left=\"{}\" Width=\"4\" Height=\"4\" HotSpot=\"k{index}_{key}\"{}/>\n",
                column * 4,
                group.map(|g| format!(" Group=\"{g}\"")).unwrap_or_default()
            ));
        }
        source.push_str("</Canvas>\n");
    }
    source.push_str("</Screens>\n");
    source
}

fn keys() -> impl Strategy<Value = Vec<Vec<(usize, Option<&'static str>)>>> {
    let group = prop::option::of(prop::sample::select(vec!["Digit", "Nav", "Fn-Keys"]));
    prop::collection::vec(prop::collection::vec((0usize..8, group), 0..5), 1..4)
}

proptest! {
    #[test]
    fn test_guard_balance(canvases in keys()) {
        let builder = ScreenBuilder::default();
        let compilation = builder.compile(&keypad(&canvases)).unwrap();
        let header = builder.export(&compilation).unwrap().header;
        assert_guards_balanced(&header);
    }

    #[test]
    fn test_group_tables_agree(canvases in keys()) {
        let builder = ScreenBuilder::default();
        let compilation = builder.compile(&keypad(&canvases)).unwrap();
        let header = builder.export(&compilation).unwrap().header;

        let groups: Vec<&str> = compilation
            .images()
            .iter()
            .flat_map(|image| image.hotspots())
            .map(|spot| spot.group.as_str())
            .fold(Vec::new(), |mut seen, group| {
                if !seen.contains(&group) {
                    seen.push(group);
                }
                seen
            });
        prop_assume!(groups.len() > 1);

        for group in groups {
            let quoted = format!("\"{group}\"");
            let suffix = group.replace('-', "_");
            let combined = table(
                &header,
                &format!("START_GROUP({quoted})"),
                &format!("END_GROUP({quoted})"),
                "\tGROUP_HOTSPOT(",
            );
            let dedicated = table(
                &header,
                &format!("START_GROUP_{suffix}({quoted})"),
                &format!("END_GROUP_{suffix}({quoted})"),
                &format!("\tGROUP_HOTSPOT_{suffix}("),
            );
            prop_assert!(!combined.is_empty());
            prop_assert_eq!(combined, dedicated);
        }
    }

    #[test]
    fn test_offsets_accumulate(
        offsets in prop::collection::vec(
            (prop::option::of(0i32..6), prop::option::of(0i32..6)),
            1..6,
        )
    ) {
        let mut source = String::from(
            "<Screens><Canvas Name=\"c\" Width=\"64\" Height=\"64\" ColorDepth=\"Color8bpp\">",
        );
        for (left, top) in &offsets {
            source.push_str("<Group");
            if let Some(left) = left {
                source.push_str(&format!(" Left=\"{left}\""));
            }
            if let Some(top) = top {
                source.push_str(&format!(" Top=\"{top}\""));
            }
            source.push('>');
        }
        source.push_str("<Rectangle Width=\"1\" Height=\"1\" HotSpot=\"p\" Location=\"p\"/>");
        source.push_str(&"</Group>".repeat(offsets.len()));
        source.push_str("</Canvas></Screens>");

        let compilation = ScreenBuilder::new(AppConfig::default()).compile(&source).unwrap();
        let image = &compilation.images()[0];
        let x: i32 = offsets.iter().filter_map(|(left, _)| *left).sum();
        let y: i32 = offsets.iter().filter_map(|(_, top)| *top).sum();

        let spot = &image.hotspots()[0];
        prop_assert_eq!((spot.min_x, spot.min_y, spot.max_x, spot.max_y), (x, y, x, y));
        let location = &image.locations()[0];
        prop_assert_eq!((location.x, location.y), (x, y));
    }
}
