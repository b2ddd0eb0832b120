//! Unit tests for the authorization policy checks.

use super::{AccessError, require_creator, require_participant, require_self};
use crate::identity::domain::UserId;
use crate::project::domain::ProjectId;
use rstest::rstest;

#[rstest]
fn require_creator_accepts_the_creator() {
    let creator = UserId::new();
    let project = ProjectId::new();

    assert_eq!(require_creator(creator, creator, project), Ok(()));
}

#[rstest]
fn require_creator_rejects_other_users() {
    let creator = UserId::new();
    let actor = UserId::new();
    let project = ProjectId::new();

    assert_eq!(
        require_creator(creator, actor, project),
        Err(AccessError::NotCreator { actor, project })
    );
}

#[rstest]
fn require_self_accepts_the_record_owner() {
    let owner = UserId::new();

    assert_eq!(require_self(owner, owner), Ok(()));
}

#[rstest]
fn require_self_rejects_other_users() {
    let owner = UserId::new();
    let actor = UserId::new();

    assert_eq!(
        require_self(owner, actor),
        Err(AccessError::NotSelf { actor, owner })
    );
}

#[rstest]
#[case(true, true)]
#[case(false, false)]
fn require_participant_follows_the_membership_fact(
    #[case] is_member: bool,
    #[case] expected_ok: bool,
) {
    let actor = UserId::new();
    let project = ProjectId::new();

    let result = require_participant(is_member, actor, project);

    assert_eq!(result.is_ok(), expected_ok);
    if !expected_ok {
        assert_eq!(result, Err(AccessError::NotParticipant { actor, project }));
    }
}
