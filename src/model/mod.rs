// 牌の検出結果から点数計算までに扱うデータモデル
mod config;
mod define;
mod detection;
mod score;
mod tile;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Res};

pub use self::{config::*, define::*, detection::*, score::*, tile::*};
