use crate::theme::Theme;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use hamcycle_core::{Cell, HamiltonianCycle, SuccessorGraph};
use std::io::{self, Write};

const BLOCK_LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const EXCLUDED_MARK: char = '·';

/// Which sides of a cell the cycle leaves through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Links {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Links {
    fn of(graph: &SuccessorGraph, cell: Cell) -> Self {
        let mut links = Links::default();
        for other in [graph.successor(cell), graph.predecessor(cell)].into_iter().flatten() {
            if other.row < cell.row {
                links.up = true;
            } else if other.row > cell.row {
                links.down = true;
            } else if other.col < cell.col {
                links.left = true;
            } else {
                links.right = true;
            }
        }
        links
    }

    fn glyph(self) -> char {
        match (self.up, self.down, self.left, self.right) {
            (true, true, _, _) => '│',
            (_, _, true, true) => '─',
            (false, true, false, true) => '┌',
            (false, true, true, false) => '┐',
            (true, false, false, true) => '└',
            (true, false, true, false) => '┘',
            _ => EXCLUDED_MARK,
        }
    }
}

/// Row of the cycle as box-drawing text, one glyph per cell joined by connectors
fn cycle_row(graph: &SuccessorGraph, row: usize) -> Vec<(Cell, String)> {
    let cols = graph.cols();
    (0..cols)
        .map(|col| {
            let cell = Cell::new(row, col);
            let links = Links::of(graph, cell);
            let mut text = links.glyph().to_string();
            if col + 1 < cols {
                text.push(if links.right { '─' } else { ' ' });
            }
            (cell, text)
        })
        .collect()
}

/// Plain-text rendering of the cycle
pub fn cycle_lines(graph: &SuccessorGraph) -> Vec<String> {
    (0..graph.rows())
        .map(|row| cycle_row(graph, row).into_iter().map(|(_, text)| text).collect())
        .collect()
}

/// Block index of every cell, row-major; `None` for cells no block covers
pub fn block_map(cycle: &HamiltonianCycle) -> Vec<Option<usize>> {
    let cols = cycle.cols();
    let mut map = vec![None; cycle.rows() * cols];
    for (i, block) in cycle.blocks().iter().enumerate() {
        for cell in block.cells() {
            map[cell.index(cols)] = Some(i);
        }
    }
    map
}

fn block_label(block: Option<usize>) -> char {
    match block {
        Some(i) => BLOCK_LABELS[i % BLOCK_LABELS.len()] as char,
        None => EXCLUDED_MARK,
    }
}

/// Plain-text partition map, one label per block
pub fn block_lines(cycle: &HamiltonianCycle) -> Vec<String> {
    let map = block_map(cycle);
    map.chunks(cycle.cols())
        .map(|row| {
            row.iter()
                .map(|&block| block_label(block).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

pub fn summary(cycle: &HamiltonianCycle) -> String {
    let stats = cycle.stats();
    let mut line = format!(
        "{}x{} cycle: {} cells, {} blocks, {} swaps",
        cycle.rows(),
        cycle.cols(),
        cycle.len(),
        stats.blocks,
        stats.swaps
    );
    if let Some(cell) = cycle.excluded() {
        line.push_str(&format!(", {} excluded", cell));
    }
    line
}

fn paint<W: Write>(out: &mut W, color: Color, text: &str) -> io::Result<()> {
    queue!(out, SetForegroundColor(color), Print(text), ResetColor)
}

/// Draw the cycle, tinting each cell with its block's color when a theme is given
pub fn draw_cycle<W: Write>(
    out: &mut W,
    cycle: &HamiltonianCycle,
    theme: Option<&Theme>,
) -> io::Result<()> {
    let Some(colors) = theme else {
        for line in cycle_lines(cycle.graph()) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "{}", summary(cycle))?;
        return out.flush();
    };
    let map = block_map(cycle);

    for row in 0..cycle.rows() {
        for (cell, text) in cycle_row(cycle.graph(), row) {
            let color = match map[cell.index(cycle.cols())] {
                Some(block) if cycle.graph().contains(cell) => colors.block_color(block),
                _ => colors.excluded,
            };
            paint(out, color, &text)?;
        }
        writeln!(out)?;
    }
    paint(out, colors.info, &summary(cycle))?;
    writeln!(out)?;
    out.flush()
}

/// Draw the partition map with one label and color per block
pub fn draw_blocks<W: Write>(
    out: &mut W,
    cycle: &HamiltonianCycle,
    theme: Option<&Theme>,
) -> io::Result<()> {
    let Some(colors) = theme else {
        for line in block_lines(cycle) {
            writeln!(out, "{}", line)?;
        }
        return out.flush();
    };
    let map = block_map(cycle);

    for row in map.chunks(cycle.cols()) {
        for (col, &block) in row.iter().enumerate() {
            if col > 0 {
                write!(out, " ")?;
            }
            let color = match block {
                Some(i) => colors.block_color(i),
                None => colors.excluded,
            };
            paint(out, color, &block_label(block).to_string())?;
        }
        writeln!(out)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamcycle_core::CycleConfig;

    #[test]
    fn test_two_by_two_is_a_box() {
        let cycle = HamiltonianCycle::build(&CycleConfig::new(2, 2).seed(0)).unwrap();
        assert_eq!(cycle_lines(cycle.graph()), vec!["┌─┐", "└─┘"]);
    }

    #[test]
    fn test_every_cell_gets_a_line_glyph() {
        let cycle = HamiltonianCycle::build(&CycleConfig::new(6, 8).seed(3)).unwrap();
        let lines = cycle_lines(cycle.graph());
        assert_eq!(lines.len(), 6);
        for line in &lines {
            assert_eq!(line.chars().count(), 8 * 2 - 1);
            assert!(!line.contains(EXCLUDED_MARK), "unlinked cell in {line}");
        }
    }

    #[test]
    fn test_block_labels() {
        let cycle = HamiltonianCycle::build(&CycleConfig::new(6, 4).max_block_size(8).seed(1)).unwrap();
        assert_eq!(
            block_lines(&cycle),
            vec!["A A B B", "A A B B", "A A B B", "C C D D", "C C D D", "C C D D"]
        );
    }

    #[test]
    fn test_plain_drawing_has_no_escape_codes() {
        let cycle = HamiltonianCycle::build(&CycleConfig::new(4, 4).seed(2)).unwrap();
        let mut out = Vec::new();
        draw_cycle(&mut out, &cycle, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\u{1b}'));
        assert!(text.ends_with(&format!("{}\n", summary(&cycle))));

        let mut colored = Vec::new();
        draw_cycle(&mut colored, &cycle, Some(&Theme::dark())).unwrap();
        assert!(String::from_utf8(colored).unwrap().contains('\u{1b}'));
    }

    #[test]
    fn test_excluded_corner_is_marked() {
        use hamcycle_core::OddGridPolicy;

        let config = CycleConfig::new(3, 5)
            .odd_grid(OddGridPolicy::ExcludeCorner)
            .seed(0);
        let cycle = HamiltonianCycle::build(&config).unwrap();
        let lines = cycle_lines(cycle.graph());
        assert!(lines[0].starts_with(EXCLUDED_MARK));
        assert!(block_lines(&cycle)[0].starts_with(EXCLUDED_MARK));
        assert!(summary(&cycle).ends_with("(0, 0) excluded"));
    }
}
