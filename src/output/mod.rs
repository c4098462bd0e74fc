// Copyright 2021 The genotype-paths developers.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

pub mod dot;
pub mod json;
pub mod table;

pub use self::dot::{DotPreferences, DotPreferencesBuilder};
