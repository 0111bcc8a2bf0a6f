mod comment;
mod follower;
mod post;
mod profile;
mod users;

use sea_query::{Alias, Iden, IntoColumnRef, IntoIden, SelectExpr, SimpleExpr};

/// Aliases every `(table_alias, column)` pair as `"alias.column"` so
/// the hand-written `FromRow` impls of the view types can pick columns
/// of joined tables apart.
fn into_view_aliases<
    A: Clone + Iden + 'static,
    B: Clone + Iden + 'static,
    T: Iterator<Item = (A, B)>,
>(
    iter: T,
) -> Vec<SelectExpr> {
    iter.map(|(a, b)| SelectExpr {
        expr: SimpleExpr::Column((a.clone(), b.clone()).into_column_ref()),
        alias: Some(Alias::new(format!("{}.{}", a.to_string(), b.to_string())).into_iden()),
        window: None,
    })
    .collect::<Vec<_>>()
}
