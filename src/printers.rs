// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::borrow::Cow;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

/// Collects lines and blocks of lines and prints them as a tree at info
/// level, e.g.
///
/// ```text
/// TOA summary
/// ├ Number of TOAs: 4
/// ├ gbt TOAs (2)
/// │ Frequency range: 1400.000 to 1500.000 MHz
/// └ ao TOAs (2)
/// ```
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    /// Render the tree without the title styling; used by tests and
    /// `display`.
    pub(crate) fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.blocks.iter().map(|b| b.len()).sum());
        let num_blocks = self.blocks.len();
        for (i_block, block) in self.blocks.iter().enumerate() {
            let num_lines = block.len();
            for (i_line, line) in block.iter().enumerate() {
                let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                    (0, false, _) => VERTICAL_AND_RIGHT,
                    (0, _, false) => VERTICAL_AND_RIGHT,
                    (0, true, true) => UP_AND_RIGHT,
                    _ => VERTICAL,
                };
                out.push(format!("{symbol} {line}"));
            }
        }
        out
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(&self.title).bold());
        for line in self.lines() {
            log::info!("{line}");
        }
        log::info!("");
    }
}
