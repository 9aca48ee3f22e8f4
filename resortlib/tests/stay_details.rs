use resortlib::stay::{ActivityPricing, FoodItem, FoodOrder, GuestCounts};
use rust_decimal::Decimal;

#[test]
fn group_price_when_no_per_type_prices() {
    let pricing = ActivityPricing {
        overall_price: Decimal::from(1500),
        participants: GuestCounts { adults: 2, kids: 2, ..Default::default() },
        ..Default::default()
    };
    assert!(pricing.is_group_price());

    let lines = pricing.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].label, "Group Price (All Participants)");
    assert_eq!(lines[0].count, None);
    assert_eq!(lines[0].subtotal, Decimal::from(1500));
}

#[test]
fn per_type_lines_skip_absent_participants() {
    let pricing = ActivityPricing {
        overall_price: Decimal::from(900),
        participants: GuestCounts { adults: 2, teens: 0, kids: 1, toddlers: 0 },
        adult_price: Decimal::from(350),
        teen_price: Decimal::from(300),
        kid_price: Decimal::from(200),
        toddler_price: Decimal::ZERO,
    };

    let lines = pricing.lines();
    let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["Adults", "Kids"]);
    assert_eq!(lines[0].count, Some(2));
    assert_eq!(lines[0].unit_price, Some(Decimal::from(350)));
    assert_eq!(lines[0].subtotal, Decimal::from(700));
    assert_eq!(lines[1].subtotal, Decimal::from(200));
}

#[test]
fn only_served_food_items_are_shown() {
    let item = |name: &str, status: &str| FoodItem {
        name: name.into(),
        quantity: 1,
        subtotal: Decimal::from(120),
        status: status.into(),
    };

    let order = FoodOrder {
        order_id: 7,
        total_amount: Decimal::from(240),
        items: vec![item("Sinigang", "Served"), item("Halo-halo", "Pending"), item("Rice", "served")],
    };
    let names: Vec<&str> = order.served_items().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Sinigang", "Rice"]);
    assert!(order.is_displayed());

    let pending = FoodOrder {
        items: vec![item("Halo-halo", "Pending")],
        ..order
    };
    assert!(!pending.is_displayed());
}

#[test]
fn huge_subtotal_saturates() {
    let pricing = ActivityPricing {
        participants: GuestCounts { adults: 1000, ..Default::default() },
        adult_price: Decimal::MAX,
        ..Default::default()
    };
    let lines = pricing.lines();
    assert_eq!(lines[0].subtotal, Decimal::MAX);
}
