//! Aggregation pipeline definitions for every report.
//!
//! Pure functions from report parameters to `Vec<Document>`; no I/O. Each
//! builder mirrors the shape its report deserializes into
//! ([`crate::models::reports`]).
//!
//! Two conventions hold across every pipeline:
//!
//! - `created_at` is normalized with `$toDate` before any calendar part is
//!   extracted, since the live collections store it as a string.
//! - Monetary sums run over `$toDecimal` (exact decimal arithmetic on the
//!   server) and are projected back out with `$toString`, which the service
//!   parses into a [`rust_decimal::Decimal`] once at the store boundary.

use mongodb::bson::{Document, doc};

use shopsight_core::{Granularity, TimePart};

/// Customers collection.
pub const CUSTOMERS: &str = "shopifyCustomers";
/// Orders collection.
pub const ORDERS: &str = "shopifyOrders";
/// Products collection. No report reads it; named for completeness.
pub const PRODUCTS: &str = "shopifyProducts";

/// Expression extracting one calendar part from a timestamp field.
///
/// The quarter is `ceil(month / 3)`, wrapped in `$toInt` so the grouping
/// key comes back as an integer rather than the double `$ceil` produces.
fn part_expr(part: TimePart, timestamp: &str) -> Document {
    match part {
        TimePart::Day => doc! { "$dayOfMonth": { "$toDate": timestamp } },
        TimePart::Month => doc! { "$month": { "$toDate": timestamp } },
        TimePart::Year => doc! { "$year": { "$toDate": timestamp } },
        TimePart::Quarter => doc! {
            "$toInt": {
                "$ceil": {
                    "$divide": [ { "$month": { "$toDate": timestamp } }, 3 ]
                }
            }
        },
    }
}

/// Grouping key extracting the granularity's calendar parts from a
/// timestamp field.
///
/// This is the bucket template every time-bucketed report groups by; the
/// repeat-customers pipeline unions it with the customer email.
fn bucket_key(granularity: Granularity, timestamp: &str) -> Document {
    let mut key = Document::new();
    for &part in granularity.parts() {
        key.insert(part.field(), part_expr(part, timestamp));
    }
    key
}

/// Sort spec for bucketed rows: year, then month, then day. Parts a coarser
/// granularity omits are absent from its keys and inert in the sort.
fn bucket_sort() -> Document {
    doc! { "_id.year": 1, "_id.month": 1, "_id.day": 1 }
}

/// Order totals summed per time bucket.
pub fn total_sales(granularity: Granularity) -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": bucket_key(granularity, "$created_at"),
            "totalSales": { "$sum": { "$toDecimal": "$total_price" } },
        } },
        doc! { "$project": { "totalSales": { "$toString": "$totalSales" } } },
        doc! { "$sort": bucket_sort() },
    ]
}

/// Order totals summed per year, with the bare year as `_id`.
pub fn yearly_sales() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": { "$year": { "$toDate": "$created_at" } },
            "totalSales": { "$sum": { "$toDecimal": "$total_price" } },
        } },
        doc! { "$project": { "totalSales": { "$toString": "$totalSales" } } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// Customers counted per creation day. Always daily.
pub fn new_customers() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": bucket_key(Granularity::Daily, "$created_at"),
            "count": { "$sum": 1 },
        } },
        doc! { "$sort": bucket_sort() },
    ]
}

/// Customers with more than one order per time bucket.
///
/// Two grouping phases: first by customer email unioned with the bucket
/// template to count purchases per customer per bucket, then - after
/// filtering to counts above one - by the bucket alone, counting how many
/// customers qualified. The second key reads the parts back out of the
/// first phase's `_id` rather than re-deriving them from `created_at`,
/// which no longer exists after a `$group`.
pub fn repeat_customers(granularity: Granularity) -> Vec<Document> {
    let mut first_key = doc! { "customerEmail": "$email" };
    first_key.extend(bucket_key(granularity, "$created_at"));

    let mut second_key = Document::new();
    for &part in granularity.parts() {
        second_key.insert(part.field(), format!("$_id.{}", part.field()));
    }

    vec![
        doc! { "$group": {
            "_id": first_key,
            "purchaseCount": { "$sum": 1 },
        } },
        doc! { "$match": { "purchaseCount": { "$gt": 1 } } },
        doc! { "$group": {
            "_id": second_key,
            "repeatCustomers": { "$sum": 1 },
        } },
        doc! { "$sort": { "_id.year": 1, "_id.month": 1, "_id.day": 1, "_id.quarter": 1 } },
    ]
}

/// Customers counted per default-address city, most populous first.
/// Customers without a city collapse into a single null key.
pub fn customer_distribution() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$default_address.city",
            "count": { "$sum": 1 },
        } },
        doc! { "$sort": { "count": -1 } },
    ]
}

/// Lifetime value per order-month cohort.
///
/// `$lookup` joins each customer to every order sharing its email, then
/// `$unwind` expands (and, with no `preserveNullAndEmptyArrays`, drops
/// customers with no orders - a cohort is defined by orders, so zero-order
/// customers belong to none). Distinct customers per cohort come from
/// `$addToSet` over the customer document id, sized in the projection.
pub fn lifetime_value_by_cohort() -> Vec<Document> {
    vec![
        doc! { "$lookup": {
            "from": ORDERS,
            "localField": "email",
            "foreignField": "email",
            "as": "orders",
        } },
        doc! { "$unwind": "$orders" },
        doc! { "$group": {
            "_id": {
                "cohort": { "$month": { "$toDate": "$orders.created_at" } },
                "year": { "$year": { "$toDate": "$orders.created_at" } },
            },
            "lifetimeValue": { "$sum": { "$toDecimal": "$orders.total_price" } },
            "customerCount": { "$addToSet": "$_id" },
        } },
        doc! { "$project": {
            "_id": 1,
            "lifetimeValue": { "$toString": "$lifetimeValue" },
            "customerCount": { "$size": "$customerCount" },
        } },
        doc! { "$sort": { "_id.year": 1, "_id.cohort": 1 } },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_key_daily() {
        assert_eq!(
            bucket_key(Granularity::Daily, "$created_at"),
            doc! {
                "day": { "$dayOfMonth": { "$toDate": "$created_at" } },
                "month": { "$month": { "$toDate": "$created_at" } },
                "year": { "$year": { "$toDate": "$created_at" } },
            }
        );
    }

    #[test]
    fn test_bucket_key_quarterly_is_integer() {
        assert_eq!(
            bucket_key(Granularity::Quarterly, "$created_at"),
            doc! {
                "quarter": { "$toInt": { "$ceil": {
                    "$divide": [ { "$month": { "$toDate": "$created_at" } }, 3 ]
                } } },
                "year": { "$year": { "$toDate": "$created_at" } },
            }
        );
    }

    #[test]
    fn test_bucket_key_yearly() {
        assert_eq!(
            bucket_key(Granularity::Yearly, "$created_at"),
            doc! { "year": { "$year": { "$toDate": "$created_at" } } }
        );
    }

    #[test]
    fn test_total_sales_stages() {
        let pipeline = total_sales(Granularity::Monthly);
        assert_eq!(
            pipeline,
            vec![
                doc! { "$group": {
                    "_id": {
                        "month": { "$month": { "$toDate": "$created_at" } },
                        "year": { "$year": { "$toDate": "$created_at" } },
                    },
                    "totalSales": { "$sum": { "$toDecimal": "$total_price" } },
                } },
                doc! { "$project": { "totalSales": { "$toString": "$totalSales" } } },
                doc! { "$sort": { "_id.year": 1, "_id.month": 1, "_id.day": 1 } },
            ]
        );
    }

    #[test]
    fn test_yearly_sales_groups_on_bare_year() {
        let pipeline = yearly_sales();
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(
            group.get_document("_id").unwrap(),
            &doc! { "$year": { "$toDate": "$created_at" } }
        );
        assert_eq!(pipeline[2], doc! { "$sort": { "_id": 1 } });
    }

    #[test]
    fn test_new_customers_is_always_daily() {
        let pipeline = new_customers();
        let key = pipeline[0]
            .get_document("$group")
            .unwrap()
            .get_document("_id")
            .unwrap();
        let fields: Vec<_> = key.keys().map(String::as_str).collect();
        assert_eq!(fields, ["day", "month", "year"]);
    }

    #[test]
    fn test_repeat_customers_first_key_unions_email_with_bucket() {
        let pipeline = repeat_customers(Granularity::Monthly);
        let key = pipeline[0]
            .get_document("$group")
            .unwrap()
            .get_document("_id")
            .unwrap();
        let fields: Vec<_> = key.keys().map(String::as_str).collect();
        assert_eq!(fields, ["customerEmail", "month", "year"]);
        assert_eq!(key.get_str("customerEmail").unwrap(), "$email");
    }

    #[test]
    fn test_repeat_customers_filters_then_regroups_by_bucket() {
        let pipeline = repeat_customers(Granularity::Quarterly);
        assert_eq!(
            pipeline[1],
            doc! { "$match": { "purchaseCount": { "$gt": 1 } } }
        );
        let second = pipeline[2]
            .get_document("$group")
            .unwrap()
            .get_document("_id")
            .unwrap();
        assert_eq!(
            second,
            &doc! { "quarter": "$_id.quarter", "year": "$_id.year" }
        );
    }

    #[test]
    fn test_distribution_sorts_descending() {
        let pipeline = customer_distribution();
        assert_eq!(pipeline[1], doc! { "$sort": { "count": -1 } });
    }

    #[test]
    fn test_cohort_join_targets_orders_by_email() {
        let pipeline = lifetime_value_by_cohort();
        assert_eq!(
            pipeline[0],
            doc! { "$lookup": {
                "from": "shopifyOrders",
                "localField": "email",
                "foreignField": "email",
                "as": "orders",
            } }
        );
        // Bare $unwind: customers with no orders are dropped.
        assert_eq!(pipeline[1], doc! { "$unwind": "$orders" });
    }

    #[test]
    fn test_cohort_counts_distinct_customers() {
        let pipeline = lifetime_value_by_cohort();
        let group = pipeline[2].get_document("$group").unwrap();
        assert_eq!(
            group.get_document("customerCount").unwrap(),
            &doc! { "$addToSet": "$_id" }
        );
        let project = pipeline[3].get_document("$project").unwrap();
        assert_eq!(
            project.get_document("customerCount").unwrap(),
            &doc! { "$size": "$customerCount" }
        );
    }
}
