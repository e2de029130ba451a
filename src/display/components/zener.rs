/*
 *  display/components/zener.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Zener symbol cycle driven by the centisecond phase
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

/// The five zener shapes. ORDER IS FIXED - the sequence is the contract.
pub const ZENER_SYMBOLS: [&str; 5] = [
    "\u{2B24}", // ⬤ black large circle
    "\u{25B2}", // ▲
    "\u{271A}", // ✚
    "\u{25BC}", // ▼
    "\u{2605}", // ★
];

/// Centisecond units per symbol bucket
pub const BUCKET_CENTIS: u8 = 20;

/// One point in the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZenerSymbol {
    pub index: usize,
    pub glyph: &'static str,
}

/// Stateless centis -> symbol mapping
pub struct SymbolCycler;

impl SymbolCycler {
    /// Bucket index for a centisecond value
    ///
    /// Five equal buckets of 20 centis; input outside 0..=99 is wrapped
    /// first so the result is always 0..=4.
    pub fn index(centis: u8) -> usize {
        ((centis % 100) / BUCKET_CENTIS) as usize % ZENER_SYMBOLS.len()
    }

    pub fn symbol(centis: u8) -> ZenerSymbol {
        let index = Self::index(centis);
        ZenerSymbol { index, glyph: ZENER_SYMBOLS[index] }
    }
}
