mod common;
use common::{TestBot, direct_message, guild_admin, guild_member, owner};
use dirk::dispatch::{CommandScope, CustomCommandRecord, CustomCommandStore, DispatchOutcome};

#[tokio::test]
async fn test_record_added_between_dispatches_is_visible() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;

    let (outcome, replies) = bot.send(guild_member(1, "!hello")).await;
    assert_eq!(outcome, DispatchOutcome::NoMatch);
    assert!(replies.is_empty());

    // Written behind the dispatcher's back
    bot.db
        .save(&CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1))
        .await?;

    assert_eq!(bot.texts(guild_member(1, "!hello")).await, vec!["hi"]);
    Ok(())
}

#[tokio::test]
async fn test_global_command_fires_everywhere() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;
    bot.send(owner(None, "!createglobalcommand hello hi")).await;

    assert_eq!(bot.texts(direct_message("!hello")).await, vec!["hi"]);
    assert_eq!(bot.texts(guild_member(1, "!hello")).await, vec!["hi"]);
    assert_eq!(bot.texts(guild_member(2, "!hello")).await, vec!["hi"]);
    Ok(())
}

#[tokio::test]
async fn test_guild_command_scoped_to_its_guild() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;
    bot.send(guild_admin(1, "!createguildcommand rules no spam")).await;

    assert_eq!(bot.texts(guild_member(1, "!rules")).await, vec!["no spam"]);

    let (outcome, replies) = bot.send(guild_member(2, "!rules")).await;
    assert_eq!(outcome, DispatchOutcome::NoMatch);
    assert!(replies.is_empty());

    let (outcome, _) = bot.send(direct_message("!rules")).await;
    assert_eq!(outcome, DispatchOutcome::NoMatch);
    Ok(())
}

#[tokio::test]
async fn test_guild_then_global_refused_both_ways() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;

    bot.send(owner(None, "!createglobalcommand hello hi")).await;
    let texts = bot.texts(guild_admin(1, "!createguildcommand hello yo")).await;
    assert_eq!(texts, vec!["There is already a global command with the name `hello`."]);

    bot.send(guild_admin(1, "!createguildcommand rules x")).await;
    let texts = bot.texts(owner(None, "!createglobalcommand rules y")).await;
    assert_eq!(texts, vec!["There is already a guild command with the name `rules`."]);

    let all = bot.db.list_all().await?;
    assert_eq!(all.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_static_commands_shadow_custom_records() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;
    // Bypasses the collision check in createglobalcommand
    bot.db
        .save(&CustomCommandRecord::new("help", CommandScope::Global, "custom help", 1))
        .await?;

    let (outcome, _) = bot.send(direct_message("!help")).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Invoked {
            command: "help".into(),
            succeeded: true
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_echo_preserves_text_verbatim() -> anyhow::Result<()> {
    let bot = TestBot::spawn().await?;
    bot.send(guild_admin(1, "!createguildcommand links see  https://example.com  twice"))
        .await;

    assert_eq!(
        bot.texts(guild_member(1, "!links ignored args")).await,
        vec!["see  https://example.com  twice"]
    );
    Ok(())
}
