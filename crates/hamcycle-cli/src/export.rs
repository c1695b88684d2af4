use hamcycle_core::{Block, Cell, CycleConfig, HamiltonianCycle, MergeStats};
use serde::Serialize;
use std::io::{self, Write};

/// JSON document describing one built cycle
#[derive(Debug, Serialize)]
pub struct CycleExport<'a> {
    pub config: &'a CycleConfig,
    pub stats: MergeStats,
    pub excluded: Option<Cell>,
    pub blocks: &'a [Block],
    /// Cells in visiting order
    pub order: &'a [Cell],
    /// `[cell, successor]` pairs in visiting order
    pub successors: Vec<(Cell, Cell)>,
    /// Visiting order of the sibling cycle through the excluded corner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detour: Option<&'a [Cell]>,
}

impl<'a> CycleExport<'a> {
    pub fn new(cycle: &'a HamiltonianCycle) -> Self {
        Self {
            config: cycle.config(),
            stats: cycle.stats(),
            excluded: cycle.excluded(),
            blocks: cycle.blocks(),
            order: cycle.graph().order(),
            successors: cycle.graph().pairs().collect(),
            detour: cycle.corner_detour().map(|graph| graph.order()),
        }
    }
}

pub fn write_json<W: Write>(w: &mut W, cycle: &HamiltonianCycle, pretty: bool) -> io::Result<()> {
    let export = CycleExport::new(cycle);
    if pretty {
        serde_json::to_writer_pretty(&mut *w, &export)?;
    } else {
        serde_json::to_writer(&mut *w, &export)?;
    }
    writeln!(w)?;
    Ok(())
}
