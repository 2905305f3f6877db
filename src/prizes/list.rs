//! Prize list edits
//!
//! Every function takes the current list and returns the next one; the
//! caller commits it through the session store.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::blob::BlobStore;
use super::model::{NewPrize, Prize};

/// Stable sort by `order`, then renumber 0..n-1
pub fn normalize_order(list: &[Prize]) -> Vec<Prize> {
    let mut sorted = list.to_vec();
    sorted.sort_by_key(|p| p.order);
    for (i, prize) in sorted.iter_mut().enumerate() {
        prize.order = i as u32;
    }
    sorted
}

/// Whether `order` is exactly 0..n-1 in list order
pub fn is_normalized(list: &[Prize]) -> bool {
    list.iter().enumerate().all(|(i, p)| p.order == i as u32)
}

fn generate_id(list: &[Prize], now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    loop {
        let id = format!("prize-{}-{:08x}", now.timestamp_millis(), rng.random::<u32>());
        if list.iter().all(|p| p.id != id) {
            return id;
        }
    }
}

/// Append a manually entered prize at the end of the list.
///
/// Returns `None` when the prize or item name is blank; CSV import would
/// reject such a row as `missing-required`.
pub fn add_prize(list: &[Prize], new: NewPrize, now: DateTime<Utc>) -> Option<Vec<Prize>> {
    let prize_name = new.prize_name.trim();
    let item_name = new.item_name.trim();
    if prize_name.is_empty() || item_name.is_empty() {
        log::warn!("Refusing to add a prize without a prize and item name");
        return None;
    }

    let mut next = normalize_order(list);
    let prize = Prize {
        id: generate_id(list, now),
        order: next.len() as u32,
        prize_name: prize_name.to_string(),
        item_name: item_name.to_string(),
        image_path: None,
        selected: false,
        memo: new.memo.filter(|m| !m.is_empty()),
    };
    log::info!("Added prize {}", prize.id);
    next.push(prize);
    Some(next)
}

pub fn toggle_selected(list: &[Prize], id: &str) -> Vec<Prize> {
    list.iter()
        .map(|p| Prize {
            selected: if p.id == id { !p.selected } else { p.selected },
            ..p.clone()
        })
        .collect()
}

/// Clear every `selected` flag
pub fn reset_selection(list: &[Prize]) -> Vec<Prize> {
    list.iter()
        .map(|p| Prize {
            selected: false,
            ..p.clone()
        })
        .collect()
}

/// Move the prize at display position `from` to position `to`. Out of range
/// positions leave the list as is.
pub fn move_prize(list: &[Prize], from: usize, to: usize) -> Vec<Prize> {
    let mut next = normalize_order(list);
    if from >= next.len() || to >= next.len() {
        return next;
    }
    let prize = next.remove(from);
    next.insert(to, prize);
    for (i, prize) in next.iter_mut().enumerate() {
        prize.order = i as u32;
    }
    next
}

/// Drop a prize and its image blob
pub fn remove_prize(list: &[Prize], id: &str, blobs: &mut dyn BlobStore) -> Vec<Prize> {
    let mut next = Vec::with_capacity(list.len());
    for prize in list {
        if prize.id == id {
            if let Some(path) = &prize.image_path {
                blobs.delete(path);
            }
            log::info!("Removed prize {id}");
        } else {
            next.push(prize.clone());
        }
    }
    normalize_order(&next)
}

/// Store `blob` as the prize's image, replacing any previous one
pub fn attach_image(
    list: &[Prize],
    id: &str,
    blob: Vec<u8>,
    blobs: &mut dyn BlobStore,
) -> Vec<Prize> {
    let Some(prize) = list.iter().find(|p| p.id == id) else {
        log::warn!("No prize {id} to attach an image to");
        return list.to_vec();
    };
    let image_id = format!("image-{id}");
    if let Some(old) = prize.image_path.as_deref().filter(|old| *old != image_id) {
        blobs.delete(old);
    }
    blobs.save(&image_id, blob);

    list.iter()
        .map(|p| Prize {
            image_path: if p.id == id {
                Some(image_id.clone())
            } else {
                p.image_path.clone()
            },
            ..p.clone()
        })
        .collect()
}
