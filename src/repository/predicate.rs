//! Turns a [`MemberSearchCondition`] into a conjunctive SQL filter.
//!
//! Each criterion yields a clause only when it is present; absent criteria
//! leave no trace in the generated statement. Present clauses are joined
//! with `AND` in a fixed order: username, team name, age lower bound, age
//! upper bound. No clauses at all means no `WHERE`.

use diesel::helper_types::LeftJoinQuerySource;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel::sqlite::Sqlite;

use crate::repository::MemberSearchCondition;
use crate::schema::{members, teams};

/// Query source of the member/team view.
pub type MemberTeamSource = LeftJoinQuerySource<members::table, teams::table>;

/// Filter over the member/team view.
pub type JoinedFilter = Box<dyn BoxableExpression<MemberTeamSource, Sqlite, SqlType = Bool>>;

/// Filter over the members table alone.
pub type MemberFilter = Box<dyn BoxableExpression<members::table, Sqlite, SqlType = Bool>>;

/// Filter used by a count statement. A count only needs the team join when
/// the team decides which members match.
pub enum CountFilter {
    Joined(Option<JoinedFilter>),
    MemberOnly(Option<MemberFilter>),
}

/// Filter for the member/team view, or `None` when every row matches.
pub fn compose(condition: &MemberSearchCondition) -> Option<JoinedFilter> {
    [
        username_eq(condition.username_criterion()),
        team_name_eq(condition.team_name_criterion()),
        age_goe(condition.age_goe),
        age_loe(condition.age_loe),
    ]
    .into_iter()
    .flatten()
    .reduce(|acc, clause| -> JoinedFilter { Box::new(acc.and(clause)) })
}

/// Same clauses as [`compose`] over the members table only. Ignores the
/// team name criterion; callers check
/// [`MemberSearchCondition::requires_team_join`] first.
fn compose_member_only(condition: &MemberSearchCondition) -> Option<MemberFilter> {
    let username = condition
        .username_criterion()
        .map(|username| -> MemberFilter { Box::new(members::username.eq(username.to_owned())) });
    let goe = condition
        .age_goe
        .map(|age| -> MemberFilter { Box::new(members::age.ge(age)) });
    let loe = condition
        .age_loe
        .map(|age| -> MemberFilter { Box::new(members::age.le(age)) });

    [username, goe, loe]
        .into_iter()
        .flatten()
        .reduce(|acc, clause| -> MemberFilter { Box::new(acc.and(clause)) })
}

/// Picks the cheapest filter that still selects the same members.
pub fn compose_count_filter(condition: &MemberSearchCondition) -> CountFilter {
    if condition.requires_team_join() {
        CountFilter::Joined(compose(condition))
    } else {
        CountFilter::MemberOnly(compose_member_only(condition))
    }
}

fn username_eq(username: Option<&str>) -> Option<JoinedFilter> {
    username.map(|username| -> JoinedFilter { Box::new(members::username.eq(username.to_owned())) })
}

/// `teams` sits on the nullable side of the join, so the column is compared
/// as nullable. A null team name never equals the criterion, which keeps
/// members without a team out of the result.
fn team_name_eq(team_name: Option<&str>) -> Option<JoinedFilter> {
    team_name.map(|name| -> JoinedFilter {
        Box::new(
            teams::name
                .nullable()
                .eq(name.to_owned())
                .assume_not_null(),
        )
    })
}

fn age_goe(age: Option<i32>) -> Option<JoinedFilter> {
    age.map(|age| -> JoinedFilter { Box::new(members::age.ge(age)) })
}

fn age_loe(age: Option<i32>) -> Option<JoinedFilter> {
    age.map(|age| -> JoinedFilter { Box::new(members::age.le(age)) })
}
