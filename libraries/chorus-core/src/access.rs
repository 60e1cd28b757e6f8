//! Access-control core
//!
//! Pure allow/deny decisions over `(Caller, resource)` pairs. No side
//! effects, no store access; the storage layer wraps these in its mutation
//! guards and the HTTP boundary maps the deny reasons to status codes.
//!
//! Two invariants worth calling out:
//! - Admin bypass exists only through the explicitly admin-scoped route
//!   ([`MutationRoute::Admin`]). An admin hitting the owner-scoped route on
//!   someone else's song is denied like anyone else.
//! - Playlists have no admin-scoped route at all; only the owner mutates
//!   them.

use crate::error::{ChorusError, Result};
use crate::types::{Caller, Identity, Playlist, Song, UserId};

/// Which entry point a song mutation came through
///
/// The two routes scope their lookups differently and must never be
/// collapsed into a single "is owner or admin" check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationRoute {
    /// Ownership-scoped route; only the song's owner passes
    Owner,
    /// Admin-scoped route; gated solely on the admin flag
    Admin,
}

/// Single-resource read gate
///
/// True iff the song is public, the caller owns it, or the caller is admin.
/// Enforced on direct fetch-by-id as well, so a private song cannot be read
/// by guessing its id.
pub fn can_read_song(caller: &Caller, song: &Song) -> bool {
    if song.is_public || caller.is_admin() {
        return true;
    }
    matches!(caller.identity(), Some(identity) if identity.id == song.owner_id)
}

/// Filter a song list down to what the caller may see
///
/// Anonymous callers see public songs only; authenticated non-admins see the
/// union of public songs and their own (each song appears once); admins see
/// everything. This is the reference semantics the storage listing must
/// agree with.
pub fn visible_songs<'a>(caller: &Caller, songs: &'a [Song]) -> Vec<&'a Song> {
    songs.iter().filter(|s| can_read_song(caller, s)).collect()
}

/// Song mutation gate, per entry point
pub fn can_mutate_song(caller: &Caller, song: &Song, route: MutationRoute) -> bool {
    match route {
        MutationRoute::Owner => {
            matches!(caller.identity(), Some(identity) if identity.id == song.owner_id)
        }
        MutationRoute::Admin => caller.is_admin(),
    }
}

/// Playlist mutation gate: authenticated owner only, no admin bypass
pub fn can_mutate_playlist(caller: &Caller, playlist: &Playlist) -> bool {
    matches!(caller.identity(), Some(identity) if identity.id == playlist.owner_id)
}

/// Require a logged-in caller
pub fn ensure_authenticated(caller: &Caller) -> Result<&Identity> {
    caller.identity().ok_or(ChorusError::Unauthenticated)
}

/// Require the admin role, distinguishing "log in" from "not allowed"
pub fn ensure_admin(caller: &Caller) -> Result<&Identity> {
    let identity = ensure_authenticated(caller)?;
    if identity.is_admin {
        Ok(identity)
    } else {
        Err(ChorusError::forbidden("admin access required"))
    }
}

/// Validated intent to change a user's role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleChange {
    pub user_id: UserId,
    pub is_admin: bool,
}

/// Role-change check
///
/// The self-protection rule comes first: an admin may not change their own
/// role, so `SelfRoleChange` wins over the admin gate for the caller's own
/// id.
pub fn change_user_role(caller: &Caller, target: UserId, new_is_admin: bool) -> Result<RoleChange> {
    let identity = ensure_authenticated(caller)?;
    if identity.id == target {
        return Err(ChorusError::SelfRoleChange);
    }
    if !identity.is_admin {
        return Err(ChorusError::forbidden("admin access required"));
    }
    Ok(RoleChange {
        user_id: target,
        is_admin: new_is_admin,
    })
}

/// User-deletion check; same shape as the role change, distinct deny reason
pub fn allow_delete_user(caller: &Caller, target: UserId) -> Result<()> {
    let identity = ensure_authenticated(caller)?;
    if identity.id == target {
        return Err(ChorusError::SelfDeletion);
    }
    if !identity.is_admin {
        return Err(ChorusError::forbidden("admin access required"));
    }
    Ok(())
}
