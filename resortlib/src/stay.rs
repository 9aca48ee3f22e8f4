//! Детали проживания для карточки бронирования: тип тура, гости,
//! участники активностей, позиции заказов еды.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourType {
    DayTour,
    OvernightTour,
}

impl TourType {
    pub fn of(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        if (check_out - check_in).num_days().abs() > 0 {
            TourType::OvernightTour
        } else {
            TourType::DayTour
        }
    }
}

impl fmt::Display for TourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TourType::DayTour => "Day Tour",
            TourType::OvernightTour => "Overnight Tour",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCounts {
    pub adults: u32,
    pub teens: u32,
    pub kids: u32,
    pub toddlers: u32,
}

fn counted(n: u32, noun: &str) -> String {
    if n > 1 {
        format!("{n} {noun}s")
    } else {
        format!("{n} {noun}")
    }
}

impl GuestCounts {
    /// Насыщается на `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.teens)
            .saturating_add(self.kids)
            .saturating_add(self.toddlers)
    }

    /// "2 adults, 1 kid"; `None`, если тип гостей один или гостей нет.
    pub fn breakdown(&self) -> Option<String> {
        let parts: Vec<String> = [
            (self.adults, "adult"),
            (self.teens, "teen"),
            (self.kids, "kid"),
            (self.toddlers, "toddler"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, noun)| counted(n, noun))
        .collect();

        (parts.len() > 1).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLine {
    pub label: String,
    /// Для групповой цены `None`.
    pub count: Option<u32>,
    pub unit_price: Option<Decimal>,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPricing {
    pub overall_price: Decimal,
    pub participants: GuestCounts,
    pub adult_price: Decimal,
    pub teen_price: Decimal,
    pub kid_price: Decimal,
    pub toddler_price: Decimal,
}

impl ActivityPricing {
    pub fn is_group_price(&self) -> bool {
        [self.adult_price, self.teen_price, self.kid_price, self.toddler_price]
            .iter()
            .all(|p| p.is_zero())
    }

    pub fn lines(&self) -> Vec<ParticipantLine> {
        if self.is_group_price() {
            return vec![ParticipantLine {
                label: "Group Price (All Participants)".into(),
                count: None,
                unit_price: None,
                subtotal: self.overall_price,
            }];
        }

        let p = &self.participants;
        [
            ("Adults", p.adults, self.adult_price),
            ("Teens", p.teens, self.teen_price),
            ("Kids", p.kids, self.kid_price),
            ("Toddlers", p.toddlers, self.toddler_price),
        ]
        .into_iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(label, count, price)| ParticipantLine {
            label: label.into(),
            count: Some(count),
            unit_price: Some(price),
            subtotal: price.saturating_mul(Decimal::from(count)),
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub status: String,
}

impl FoodItem {
    pub fn is_served(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("served")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodOrder {
    pub order_id: i64,
    pub total_amount: Decimal,
    pub items: Vec<FoodItem>,
}

impl FoodOrder {
    pub fn served_items(&self) -> impl Iterator<Item = &FoodItem> {
        self.items.iter().filter(|i| i.is_served())
    }

    /// Заказ без поданных позиций на карточке не показывается.
    pub fn is_displayed(&self) -> bool {
        self.served_items().next().is_some()
    }
}
