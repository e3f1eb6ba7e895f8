use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use sealfolio_core::holdings::LotStatus;
use sealfolio_core::prices::{
    DataSource, PriceRepository, PriceService, PriceServiceTrait, PriceUpdate,
};
use sealfolio_core::products::{
    NewProduct, ProductRepository, ProductService, ProductServiceTrait,
};
use sealfolio_core::transactions::{
    NewTransaction, TransactionError, TransactionRepository, TransactionService,
    TransactionServiceTrait, TransactionType,
};
use sealfolio_core::valuation::{ValuationRepository, ValuationService, ValuationServiceTrait};

mod common;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct Fixture {
    product_service: Arc<ProductService>,
    price_service: Arc<PriceService>,
    transaction_repository: Arc<TransactionRepository>,
    transaction_service: TransactionService,
    valuation_service: ValuationService,
    _temp_dir: tempfile::TempDir,
}

fn setup() -> Fixture {
    let (pool, temp_dir) = common::setup_test_db();

    let product_repository = Arc::new(ProductRepository::new(pool.clone()));
    let product_service = Arc::new(ProductService::new(product_repository));

    let price_repository = Arc::new(PriceRepository::new(pool.clone()));
    let price_service = Arc::new(PriceService::new(price_repository));

    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone()));
    let transaction_service = TransactionService::new(
        transaction_repository.clone(),
        product_service.clone(),
    )
    .unwrap();

    let valuation_repository = Arc::new(ValuationRepository::new(pool));
    let valuation_service = ValuationService::new(
        transaction_repository.clone(),
        price_service.clone(),
        valuation_repository,
    );

    Fixture {
        product_service,
        price_service,
        transaction_repository,
        transaction_service,
        valuation_service,
        _temp_dir: temp_dir,
    }
}

fn seed_catalog(fixture: &Fixture) {
    fixture
        .product_service
        .upsert_product(NewProduct {
            id: "151".to_string(),
            name: "Scarlet & Violet 151 Booster Bundle".to_string(),
            first_available_date: d(2024, 1, 1),
        })
        .unwrap();
    fixture
        .product_service
        .upsert_product(NewProduct {
            id: "207".to_string(),
            name: "Obsidian Flames Elite Trainer Box".to_string(),
            first_available_date: d(2024, 3, 15),
        })
        .unwrap();
}

fn buy(product_id: &str, quantity: i64, price: Decimal, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        product_id: product_id.to_string(),
        transaction_type: TransactionType::Buy,
        quantity,
        unit_price: Some(price),
        transaction_date: date,
    }
}

#[test]
fn test_ledger_holdings_and_valuation_flow() {
    let fixture = setup();
    seed_catalog(&fixture);

    fixture
        .price_service
        .upsert_prices(vec![
            PriceUpdate {
                product_id: "151".to_string(),
                price_date: d(2024, 1, 10),
                market_price: dec!(45.00),
                data_source: DataSource::Import,
            },
            PriceUpdate {
                product_id: "151".to_string(),
                price_date: d(2024, 2, 15),
                market_price: dec!(50.00),
                data_source: DataSource::Import,
            },
            PriceUpdate {
                product_id: "207".to_string(),
                price_date: d(2024, 3, 20),
                market_price: dec!(60.00),
                data_source: DataSource::Import,
            },
        ])
        .unwrap();

    // Two buys, a sale clearing the older lot, then an open from the newer.
    fixture
        .transaction_service
        .submit_transaction(buy("151", 3, dec!(40.00), d(2024, 1, 5)))
        .unwrap();
    fixture
        .transaction_service
        .submit_transaction(buy("151", 2, dec!(44.00), d(2024, 2, 1)))
        .unwrap();
    let sale = fixture
        .transaction_service
        .submit_transaction(NewTransaction {
            product_id: "151".to_string(),
            transaction_type: TransactionType::Sell,
            quantity: 3,
            unit_price: Some(dec!(55.00)),
            transaction_date: d(2024, 2, 20),
        })
        .unwrap();
    fixture
        .transaction_service
        .submit_transaction(NewTransaction {
            product_id: "151".to_string(),
            transaction_type: TransactionType::Open,
            quantity: 1,
            unit_price: None,
            transaction_date: d(2024, 2, 25),
        })
        .unwrap();

    // FIFO: the sale drains the January lot, 3 × (55 − 40).
    assert_eq!(sale.realized_gain, Some(dec!(45.00)));

    let holding = fixture.transaction_service.holdings_for("151").unwrap();
    assert_eq!(holding.sealed_quantity, 1);
    assert_eq!(holding.opened_quantity, 1);
    assert_eq!(holding.sold_quantity, 3);
    assert_eq!(
        holding.sealed_quantity + holding.opened_quantity + holding.sold_quantity,
        5
    );
    assert_eq!(holding.sealed_cost_basis, dec!(44.00));
    assert_eq!(holding.opened_cost_basis, dec!(44.00));

    // Ledger queries agree with independent sums over the lot records.
    let lots = fixture.transaction_service.get_lots("151").unwrap();
    let total_quantity: i64 = lots.iter().map(|lot| lot.quantity).sum();
    assert_eq!(total_quantity, 5);
    let sold_quantity: i64 = lots
        .iter()
        .filter(|lot| lot.status == LotStatus::Sold)
        .map(|lot| lot.quantity)
        .sum();
    assert_eq!(sold_quantity, holding.sold_quantity);

    let transactions = fixture.transaction_service.get_transactions().unwrap();
    assert_eq!(transactions.len(), 4);
    assert!(transactions.windows(2).all(|pair| {
        (pair[0].effective_date, pair[0].id) < (pair[1].effective_date, pair[1].id)
    }));
    let up_to = fixture
        .transaction_service
        .transactions_up_to(d(2024, 2, 10))
        .unwrap();
    assert_eq!(up_to.len(), 2);

    // Valuation curve over the union of price and transaction dates.
    let points = fixture.valuation_service.recalculate().unwrap();
    assert!(!points.is_empty());
    assert_eq!(points.first().unwrap().valuation_date, d(2024, 1, 5));

    for pair in points.windows(2) {
        assert!(pair[1].cumulative_spent >= pair[0].cumulative_spent);
        assert!(pair[1].cumulative_revenue >= pair[0].cumulative_revenue);
    }

    let last = points.last().unwrap();
    // Spent: 3×40 + 2×44 = 208. Revenue: 3×55 = 165.
    assert_eq!(last.cumulative_spent, dec!(208.00));
    assert_eq!(last.cumulative_revenue, dec!(165.00));
    assert_eq!(last.net_investment, dec!(43.00));
    // One sealed unit at the latest observed price.
    assert_eq!(last.market_value, dec!(50.00));
    assert_eq!(last.sealed_cost_basis, dec!(44.00));
    assert_eq!(last.opened_cost_basis, dec!(44.00));
    assert_eq!(last.cost_basis, dec!(88.00));

    // The cache serves slices and the latest point.
    let slice = fixture
        .valuation_service
        .get_historical_valuations(Some(d(2024, 2, 1)), Some(d(2024, 2, 15)))
        .unwrap();
    assert!(slice
        .iter()
        .all(|p| p.valuation_date >= d(2024, 2, 1) && p.valuation_date <= d(2024, 2, 15)));
    let latest = fixture.valuation_service.get_latest_valuation().unwrap().unwrap();
    assert_eq!(latest.valuation_date, last.valuation_date);

    // Incremental tail recompute returns the same values it replaces.
    let tail = fixture
        .valuation_service
        .recalculate_from(d(2024, 2, 15))
        .unwrap();
    assert!(!tail.is_empty());
    assert_eq!(tail.last().unwrap().cumulative_spent, dec!(208.00));
}

#[test]
fn test_date_adjustment_against_catalog() {
    let fixture = setup();
    seed_catalog(&fixture);

    // Requested before the product's first-available date.
    let adjusted = fixture
        .transaction_service
        .submit_transaction(buy("207", 1, dec!(50.00), d(2024, 3, 1)))
        .unwrap();
    assert_eq!(adjusted.requested_date, d(2024, 3, 1));
    assert_eq!(adjusted.effective_date, d(2024, 3, 15));
    assert!(adjusted.date_adjusted);

    let unadjusted = fixture
        .transaction_service
        .submit_transaction(buy("207", 1, dec!(50.00), d(2024, 4, 1)))
        .unwrap();
    assert!(!unadjusted.date_adjusted);
    assert_eq!(unadjusted.effective_date, d(2024, 4, 1));
}

#[test]
fn test_validation_failures_leave_no_trace() {
    let fixture = setup();
    seed_catalog(&fixture);

    fixture
        .transaction_service
        .submit_transaction(buy("151", 2, dec!(40.00), d(2024, 1, 5)))
        .unwrap();

    // Unknown product.
    let unknown = fixture
        .transaction_service
        .submit_transaction(buy("999", 1, dec!(10.00), d(2024, 1, 10)));
    assert!(matches!(unknown, Err(TransactionError::UnknownProduct(_))));

    // Overselling, with the available quantity reported back.
    let oversell = fixture.transaction_service.submit_transaction(NewTransaction {
        product_id: "151".to_string(),
        transaction_type: TransactionType::Sell,
        quantity: 5,
        unit_price: Some(dec!(60.00)),
        transaction_date: d(2024, 1, 20),
    });
    match oversell {
        Err(TransactionError::InsufficientInventory {
            requested,
            available,
        }) => {
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientInventory, got {:?}", other),
    }

    // Open with a price is rejected before anything mutates.
    let priced_open = fixture.transaction_service.submit_transaction(NewTransaction {
        product_id: "151".to_string(),
        transaction_type: TransactionType::Open,
        quantity: 1,
        unit_price: Some(dec!(1.00)),
        transaction_date: d(2024, 1, 20),
    });
    assert!(matches!(priced_open, Err(TransactionError::InvalidPrice(_))));

    // Only the initial buy is in the ledger, and holdings are untouched.
    assert_eq!(fixture.transaction_service.get_transactions().unwrap().len(), 1);
    let holding = fixture.transaction_service.holdings_for("151").unwrap();
    assert_eq!(holding.sealed_quantity, 2);
    assert_eq!(holding.sold_quantity, 0);
}

#[test]
fn test_db_init_prepares_database_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db_path = sealfolio_core::db::init(temp_dir.path().to_str().unwrap()).unwrap();
    assert!(std::path::Path::new(&db_path).exists());

    let pool = sealfolio_core::db::create_pool(&db_path).unwrap();
    sealfolio_core::db::run_migrations(&pool).unwrap();

    // Migrated schema accepts catalog rows.
    let product_service = ProductService::new(Arc::new(ProductRepository::new(pool)));
    product_service
        .upsert_product(NewProduct {
            id: "1".to_string(),
            name: "Base Set Booster Box".to_string(),
            first_available_date: d(1999, 1, 9),
        })
        .unwrap();
    let stored = product_service.get_product("1").unwrap();
    assert_eq!(stored.name, "Base Set Booster Box");
    assert_eq!(stored.first_available_date, d(1999, 1, 9));
}

#[test]
fn test_state_survives_service_restart() {
    let fixture = setup();
    seed_catalog(&fixture);

    fixture
        .transaction_service
        .submit_transaction(buy("151", 4, dec!(42.00), d(2024, 1, 5)))
        .unwrap();
    fixture
        .transaction_service
        .submit_transaction(NewTransaction {
            product_id: "151".to_string(),
            transaction_type: TransactionType::Open,
            quantity: 1,
            unit_price: None,
            transaction_date: d(2024, 1, 12),
        })
        .unwrap();

    // A new service instance replays the persisted ledger into the same
    // holdings.
    let reloaded = TransactionService::new(
        fixture.transaction_repository.clone(),
        fixture.product_service.clone(),
    )
    .unwrap();
    let before = fixture.transaction_service.holdings_for("151").unwrap();
    let after = reloaded.holdings_for("151").unwrap();
    assert_eq!(before, after);
    assert_eq!(after.sealed_quantity, 3);
    assert_eq!(after.opened_quantity, 1);
}
