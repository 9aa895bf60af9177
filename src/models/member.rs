//! Diesel models representing members and the flat member/team projection.

use diesel::prelude::*;

use crate::domain::member::{Member as DomainMember, NewMember as DomainNewMember};
use crate::domain::types::{MemberId, TeamId, TeamName, TypeConstraintError, Username};
use crate::dto::member::MemberTeamDto;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::members)]
/// Diesel model for [`crate::domain::member::Member`].
pub struct Member {
    pub id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::members)]
/// Insertable form of [`Member`].
pub struct NewMember<'a> {
    pub username: &'a str,
    pub age: i32,
    pub team_id: Option<i32>,
}

/// One row of `members LEFT JOIN teams`; team columns are null for members
/// without a team.
#[derive(Debug, Clone, Queryable)]
pub struct MemberTeamRow {
    pub member_id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

impl TryFrom<Member> for DomainMember {
    type Error = TypeConstraintError;

    fn try_from(member: Member) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId::try_from(member.id)?,
            username: Username::new(member.username)?,
            age: member.age,
            team_id: member.team_id.map(TeamId::try_from).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewMember> for NewMember<'a> {
    fn from(member: &'a DomainNewMember) -> Self {
        Self {
            username: member.username.as_str(),
            age: member.age,
            team_id: member.team_id.map(TeamId::get),
        }
    }
}

impl TryFrom<MemberTeamRow> for MemberTeamDto {
    type Error = TypeConstraintError;

    fn try_from(row: MemberTeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            member_id: MemberId::try_from(row.member_id)?,
            username: Username::new(row.username)?,
            age: row.age,
            team_id: row.team_id.map(TeamId::try_from).transpose()?,
            team_name: row.team_name.map(TeamName::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_domain_newmember() {
        let domain = DomainNewMember::new(
            Username::new("member1").expect("valid username"),
            10,
            Some(TeamId::new(3).expect("valid team id")),
        );
        let new: NewMember = (&domain).into();
        assert_eq!(new.username, "member1");
        assert_eq!(new.age, 10);
        assert_eq!(new.team_id, Some(3));
    }

    #[test]
    fn member_without_team_into_domain() {
        let db = Member {
            id: 4,
            username: "member4".into(),
            age: 40,
            team_id: None,
        };
        let domain = DomainMember::try_from(db).expect("valid member");
        assert_eq!(domain.id.get(), 4);
        assert_eq!(domain.username.as_str(), "member4");
        assert_eq!(domain.team_id, None);
    }

    #[test]
    fn row_with_null_team_into_dto() {
        let row = MemberTeamRow {
            member_id: 1,
            username: "member1".into(),
            age: 10,
            team_id: None,
            team_name: None,
        };
        let dto = MemberTeamDto::try_from(row).expect("valid row");
        assert_eq!(dto.member_id.get(), 1);
        assert_eq!(dto.team_id, None);
        assert_eq!(dto.team_name, None);
    }

    #[test]
    fn row_with_blank_username_is_rejected() {
        let row = MemberTeamRow {
            member_id: 1,
            username: "  ".into(),
            age: 10,
            team_id: Some(1),
            team_name: Some("teamA".into()),
        };
        assert_eq!(
            MemberTeamDto::try_from(row),
            Err(TypeConstraintError::EmptyString)
        );
    }
}
