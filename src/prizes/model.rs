//! Prize records

use serde::{Deserialize, Serialize};

/// A prize shown on the wheel/list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub id: String,
    /// Display position, dense and 0-based once normalized
    pub order: u32,
    pub prize_name: String,
    pub item_name: String,
    /// Blob store reference for the prize image
    pub image_path: Option<String>,
    /// Already handed out
    pub selected: bool,
    pub memo: Option<String>,
}

/// User-entered fields for a manually added prize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPrize {
    pub prize_name: String,
    pub item_name: String,
    pub memo: Option<String>,
}

pub type PrizeList = Vec<Prize>;
