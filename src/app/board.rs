//! The visible grid: one derived node per cell, wrapping around.

use anyhow::Result;
use serde::Serialize;

use crate::model::network::NetworkNode;
use crate::model::representation::{at_least, convolve, hue, luminance, saturation, Filter};
use crate::model::{Activation, RandomSource, Simulation};

/// Role colors shown instead of node colors in cheat mode.
pub const REWARD_COLORS: (u32, u32) = (0x0000ff, 0x00007f);
pub const PUNISH_COLORS: (u32, u32) = (0xff0000, 0x7f0000);
pub const STATEFUL_COLORS: (u32, u32) = (0x00ff00, 0x007f00);
pub const PLAIN_COLORS: (u32, u32) = (0xffffff, 0x000000);

/// Cheat-mode color revealing a node's role.
#[must_use]
pub fn secret_color(node: &NetworkNode, state: Activation) -> u32 {
    let (active, inactive) = if node.is_rewarding() {
        REWARD_COLORS
    } else if node.is_punishing() {
        PUNISH_COLORS
    } else if node.is_stateful() {
        STATEFUL_COLORS
    } else {
        PLAIN_COLORS
    };
    if state.is_active() {
        active
    } else {
        inactive
    }
}

/// Averages over the current board, for logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardSummary {
    pub luminance: f64,
    pub saturation: f64,
    pub hue: f64,
    /// At least half the cells sit in a bright neighbourhood.
    pub bright: bool,
}

#[derive(Debug, Clone)]
pub struct Board {
    dim: usize,
    cheat_mode: bool,
    cells: Vec<u32>,
}

impl Board {
    pub fn new(dim: usize, cheat_mode: bool) -> Self {
        Self {
            dim,
            cheat_mode,
            cells: vec![0; dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row-major cell colors.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.dim || y >= self.dim {
            return None;
        }
        self.cells.get(x * self.dim + y).copied()
    }

    /// Repaints every cell from the committed network state.
    pub fn update<R: RandomSource + Clone>(&mut self, game: &Simulation<R>) -> Result<()> {
        let network = game.network();
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            let node = game.lookup(idx)?;
            let state = network.state(node.id)?;
            *cell = if self.cheat_mode {
                secret_color(node, state)
            } else {
                node.color(state)
            };
        }
        Ok(())
    }

    pub fn feature_map(&self, filter: Filter) -> Vec<f64> {
        self.cells.iter().map(|&c| filter(c)).collect()
    }

    /// Mean of `filter` over each cell's 3×3 neighbourhood.
    pub fn smoothed(&self, filter: Filter) -> Vec<f64> {
        convolve(&self.cells, self.dim, |window| {
            window.iter().map(|&c| filter(c)).sum::<f64>() / 9.0
        })
    }

    pub fn summary(&self) -> BoardSummary {
        let mean = |values: Vec<f64>| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        let smoothed = self.smoothed(luminance);
        BoardSummary {
            luminance: mean(self.feature_map(luminance)),
            saturation: mean(self.feature_map(saturation)),
            hue: mean(self.feature_map(hue)),
            bright: at_least(0.5, |l: &f64| *l > 0.5, &smoothed),
        }
    }
}
