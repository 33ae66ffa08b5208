//! Cart snapshots surviving a store reopen.

#![allow(clippy::unwrap_used)]

use electroverse_core::ProductId;
use electroverse_storefront::cart::{Cart, CartRepository, Direction, keys};
use electroverse_storefront::catalog;
use electroverse_storefront::storage::{FileStore, KeyValueStore};
use tempfile::TempDir;

fn open(dir: &TempDir) -> CartRepository<FileStore> {
    CartRepository::new(FileStore::open(dir.path().join("storefront.json")).unwrap())
}

#[test]
fn test_cart_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut cart = Cart::initialize(open(&dir));
        cart.change_quantity(ProductId::new(7), Direction::Increase)
            .unwrap();
        cart.apply_coupon("ELECTROVERSE20").unwrap();
    }

    let cart = Cart::initialize(open(&dir));
    let monitor = cart
        .items()
        .iter()
        .find(|i| i.id == ProductId::new(7))
        .unwrap();
    assert_eq!(monitor.quantity, 3);
    assert!(cart.coupon_applied());
    assert!(!cart.compute_totals().discount.is_zero());
}

#[test]
fn test_removed_items_stay_removed() {
    let dir = TempDir::new().unwrap();

    {
        let mut cart = Cart::initialize(open(&dir));
        cart.remove_item(ProductId::new(1)).unwrap();
    }

    let cart = Cart::initialize(open(&dir));
    assert_eq!(cart.items().len(), 2);
    assert!(cart.items().iter().all(|i| i.id != ProductId::new(1)));
}

#[test]
fn test_malformed_items_fall_back_to_seed() {
    let dir = TempDir::new().unwrap();
    open(&dir).store().set(keys::ITEMS, "{not json").unwrap();

    let cart = Cart::initialize(open(&dir));
    assert_eq!(cart.items(), catalog::seed_items().as_slice());

    // The seed is written back over the bad value.
    let repo = open(&dir);
    assert_eq!(repo.load_items().unwrap(), catalog::seed_items());
}

#[test]
fn test_corrupt_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storefront.json");
    std::fs::write(&path, "garbage").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(keys::ITEMS), None);
}

#[test]
fn test_clear_after_order_reseeds_next_load() {
    let dir = TempDir::new().unwrap();
    {
        let mut cart = Cart::initialize(open(&dir));
        cart.apply_coupon("ELECTROVERSE20").unwrap();
    }

    open(&dir).clear().unwrap();

    let repo = open(&dir);
    assert_eq!(repo.load_items(), Some(Vec::new()));
    assert_eq!(repo.load_discount(), None);

    let cart = Cart::initialize(repo);
    assert_eq!(cart.items().len(), 3);
    assert!(!cart.coupon_applied());
}
