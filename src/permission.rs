//! Authorization rules.
//!
//! Pure functions over session flags, member rights and channel options.
//! Each denial carries the error shown to the requester.

use wschat_proto::{AddressSpec, MemberModes, UserModes, UserModesUpdate};

use crate::error::ChatError;
use crate::state::ChannelOptions;

/// Server-wide operations reserved to admins: global user listing and wall.
pub fn require_admin(user: UserModes) -> Result<(), ChatError> {
    if user.admin {
        Ok(())
    } else {
        Err(ChatError::InsufficientPrivileges)
    }
}

pub fn set_motd(user: UserModes) -> Result<(), ChatError> {
    if user.admin {
        Ok(())
    } else {
        Err(ChatError::MotdDenied)
    }
}

/// Whether a channel is visible: to its members, to anyone unless secret,
/// and always to admins.
pub fn can_see_channel(user: UserModes, member: Option<MemberModes>, channel: &ChannelOptions) -> bool {
    user.admin || member.is_some() || !channel.secret
}

pub fn join(
    user: UserModes,
    name: &str,
    channel: &ChannelOptions,
    password: Option<&str>,
) -> Result<(), ChatError> {
    if user.admin || channel.admits(password) {
        Ok(())
    } else {
        Err(ChatError::PasswordRequired(name.to_string()))
    }
}

pub fn set_topic(
    user: UserModes,
    member: Option<MemberModes>,
    channel: &ChannelOptions,
) -> Result<(), ChatError> {
    let operator = member.is_some_and(|m| m.operator);
    if user.admin || operator || !channel.topic_locked {
        Ok(())
    } else {
        Err(ChatError::TopicDenied)
    }
}

pub fn talk(user: UserModes, member: MemberModes, channel: &ChannelOptions) -> Result<(), ChatError> {
    if !channel.moderated || member.operator || member.voiced || user.admin {
        Ok(())
    } else {
        Err(ChatError::CannotTalk)
    }
}

fn is_operator_or_admin(user: UserModes, member: Option<MemberModes>) -> bool {
    user.admin || member.is_some_and(|m| m.operator)
}

pub fn change_channel_modes(
    user: UserModes,
    member: Option<MemberModes>,
    name: &str,
) -> Result<(), ChatError> {
    if is_operator_or_admin(user, member) {
        Ok(())
    } else {
        Err(ChatError::ChannelModeDenied(name.to_string()))
    }
}

pub fn change_member_modes(user: UserModes, member: Option<MemberModes>) -> Result<(), ChatError> {
    if is_operator_or_admin(user, member) {
        Ok(())
    } else {
        Err(ChatError::MemberModeDenied)
    }
}

pub fn kick(
    user: UserModes,
    member: Option<MemberModes>,
    victim: &AddressSpec,
    name: &str,
) -> Result<(), ChatError> {
    if is_operator_or_admin(user, member) {
        Ok(())
    } else {
        Err(ChatError::KickDenied {
            user: victim.clone(),
            channel: name.to_string(),
        })
    }
}

/// Touching `admin` needs admin rights; applies to the whole request.
pub fn touch_admin_flag(actor: UserModes, update: &UserModesUpdate) -> Result<(), ChatError> {
    if update.admin.is_some() && !actor.admin {
        Err(ChatError::InsufficientPrivileges)
    } else {
        Ok(())
    }
}

/// Setting `bot` on someone else needs admin rights; checked per target.
pub fn set_bot_flag(actor: UserModes, on_self: bool, update: &UserModesUpdate) -> Result<(), ChatError> {
    if update.bot.is_some() && !actor.admin && !on_self {
        Err(ChatError::BotDenied)
    } else {
        Ok(())
    }
}
