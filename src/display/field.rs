/*
 *  display/field.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Field identifiers for the clock face
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

/// Which slot of the active color table a field is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    Date,
    Time,
    SubSecond,
    Control,
}

/// Field identifier on the rendering surface
///
/// Fields are addressed by id, the surface owns their placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Date,
    Hour,
    ColonHm,
    Minute,
    ColonMs,
    Second,
    Centis,
    Symbol,
    ToggleControl,
    Clapper,
}

impl FieldId {
    /// Every field, in left-to-right, top-to-bottom order
    pub const ALL: [FieldId; 10] = [
        FieldId::Date,
        FieldId::Hour,
        FieldId::ColonHm,
        FieldId::Minute,
        FieldId::ColonMs,
        FieldId::Second,
        FieldId::Centis,
        FieldId::Symbol,
        FieldId::ToggleControl,
        FieldId::Clapper,
    ];

    /// Color slot this field takes from the theme
    ///
    /// The clapper is drawn in the time color and faded by the pulse alpha.
    pub fn color_role(&self) -> ColorRole {
        match self {
            FieldId::Date => ColorRole::Date,
            FieldId::Hour
            | FieldId::ColonHm
            | FieldId::Minute
            | FieldId::ColonMs
            | FieldId::Second
            | FieldId::Clapper => ColorRole::Time,
            FieldId::Centis | FieldId::Symbol => ColorRole::SubSecond,
            FieldId::ToggleControl => ColorRole::Control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_lists_every_field_once() {
        let mut fields = FieldId::ALL.to_vec();
        fields.sort();
        fields.dedup();
        assert_eq!(fields.len(), FieldId::ALL.len());
    }

    #[test]
    fn test_sub_second_and_symbol_share_a_role() {
        assert_eq!(FieldId::Centis.color_role(), FieldId::Symbol.color_role());
        assert_eq!(FieldId::ColonHm.color_role(), ColorRole::Time);
        assert_eq!(FieldId::ToggleControl.color_role(), ColorRole::Control);
    }
}
