//! Reconciliation of wishlist data fetched through separate calls.
//!
//! A wishlist is known to the client through two lists: the bare place names
//! (`GET /wishlists/{name}`) and the enriched detail records
//! (`GET /wishlists/{name}/details`). Either may fail or lag behind the
//! other, so the view shown to the user is always the merge of both.
//!
//! Places are matched by trimmed, lower-cased name. Two names that differ
//! only in case or surrounding blanks are the same place.

use std::collections::HashSet;

use api_types::wishlist::WishlistItemDetail;

use crate::client::{Backend, ClientError};

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn same_place(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

pub fn contains_place<S: AsRef<str>>(places: &[S], place_name: &str) -> bool {
    places.iter().any(|place| same_place(place.as_ref(), place_name))
}

/// Details win; bare places missing from the details are appended as
/// records with empty optional fields, in their original order.
pub fn merge_details(
    details: Vec<WishlistItemDetail>,
    places: &[String],
) -> Vec<WishlistItemDetail> {
    let in_details: HashSet<String> = details
        .iter()
        .map(|detail| normalize_name(&detail.place_name))
        .collect();

    let mut merged = details;
    let mut appended = HashSet::new();
    for place in places {
        let key = normalize_name(place);
        if in_details.contains(&key) || !appended.insert(key) {
            continue;
        }
        merged.push(WishlistItemDetail::bare(place.clone()));
    }
    merged
}

/// Normalized names of every place saved in the given lists.
pub fn exclusion_set<'a, I>(place_lists: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    place_lists
        .into_iter()
        .flatten()
        .map(|place| normalize_name(place))
        .collect()
}

/// Hides places already saved in another wishlist.
///
/// Never returns an empty list when `items` is not empty: if every item is
/// excluded the unfiltered list is returned instead.
pub fn exclude_saved_elsewhere(
    items: Vec<WishlistItemDetail>,
    excluded: &HashSet<String>,
) -> Vec<WishlistItemDetail> {
    if excluded.is_empty() {
        return items;
    }
    let kept: Vec<WishlistItemDetail> = items
        .iter()
        .filter(|item| !excluded.contains(&normalize_name(&item.place_name)))
        .cloned()
        .collect();
    if kept.is_empty() { items } else { kept }
}

/// Case-insensitive substring match on the place name; blank term keeps all.
pub fn filter_by_term<'a>(
    items: &'a [WishlistItemDetail],
    term: &str,
) -> Vec<&'a WishlistItemDetail> {
    let term = normalize_name(term);
    items
        .iter()
        .filter(|item| term.is_empty() || normalize_name(&item.place_name).contains(&term))
        .collect()
}

/// Result of loading one wishlist for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    pub places: Vec<String>,
    pub items: Vec<WishlistItemDetail>,
}

/// Fetches places and details side by side and merges them.
///
/// A failed details call degrades to bare names, a failed places call to
/// details only. Only when both fail is the error returned.
pub async fn load_reconciled<B: Backend>(
    backend: &B,
    name: &str,
) -> Result<Reconciled, ClientError> {
    let (places, details) = tokio::join!(
        backend.wishlist_places(name),
        backend.wishlist_details(name)
    );

    let (places, details) = match (places, details) {
        (Err(err), Err(details_err)) => {
            tracing::warn!(wishlist = %name, %details_err, "wishlist details unavailable");
            return Err(err);
        }
        (Ok(places), Ok(details)) => (places, details),
        (Ok(places), Err(err)) => {
            tracing::warn!(wishlist = %name, %err, "wishlist details unavailable, using names");
            (places, Vec::new())
        }
        (Err(err), Ok(details)) => {
            tracing::warn!(wishlist = %name, %err, "wishlist places unavailable, using details");
            let places = details.iter().map(|d| d.place_name.clone()).collect();
            (places, details)
        }
    };

    Ok(Reconciled {
        items: merge_details(details, &places),
        places,
    })
}

/// Places saved in every wishlist except `current`.
///
/// Wishlists whose place list cannot be fetched are skipped.
pub async fn places_in_other_wishlists<B: Backend>(
    backend: &B,
    current: &str,
    all: &[String],
) -> HashSet<String> {
    let mut lists = Vec::new();
    for name in all.iter().filter(|name| !same_place(name, current)) {
        match backend.wishlist_places(name).await {
            Ok(places) => lists.push(places),
            Err(err) => tracing::debug!(wishlist = %name, %err, "skipping wishlist in exclusion"),
        }
    }
    exclusion_set(&lists)
}
