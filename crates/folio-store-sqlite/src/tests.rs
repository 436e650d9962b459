//! Integration tests for `SqliteStore` against an in-memory database.

use folio_core::{
  profile::{Experience, ExperienceInput, Profile, ProfileFields, ProfileInput},
  store::AccountStore,
  user::{NewUser, User, gravatar_url},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str) -> User {
  s.add_user(NewUser::new(email, "Ada Lovelace", "$2b$04$not-a-real-hash".into()))
    .await
    .unwrap()
}

fn fields(status: &str) -> ProfileFields {
  ProfileFields::try_from(ProfileInput {
    status: Some(status.into()),
    skills: Some("rust, sql".into()),
    ..Default::default()
  })
  .unwrap()
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;
  let created = user(&s, "ada@example.com").await;
  assert_eq!(created.avatar, gravatar_url("ada@example.com"));

  let fetched = s.get_user(created.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.email, "ada@example.com");
  assert_eq!(fetched.password_hash, "$2b$04$not-a-real-hash");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn email_lookup_is_case_insensitive() {
  let s = store().await;
  let created = user(&s, "Ada@Example.com").await;
  assert_eq!(created.email, "ada@example.com");

  let found = s.find_user_by_email(" ADA@example.COM ").await.unwrap();
  assert_eq!(found.map(|u| u.user_id), Some(created.user_id));
  assert!(s.find_user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "ada@example.com").await;
  let err = s
    .add_user(NewUser::new("ADA@example.com", "Imposter", "x".into()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EmailTaken(ref e) if e == "ada@example.com"));
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_profile() {
  let s = store().await;
  let owner = user(&s, "ada@example.com").await;

  let mut profile = Profile::new(owner.user_id);
  profile.apply(fields("Developer"));
  s.save_profile(profile.clone()).await.unwrap();

  let fetched = s.get_profile(owner.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.profile_id, profile.profile_id);
  assert_eq!(fetched.status.as_deref(), Some("Developer"));
  assert_eq!(fetched.skills, ["rust", "sql"]);
}

#[tokio::test]
async fn save_profile_overwrites_existing_document() {
  let s = store().await;
  let owner = user(&s, "ada@example.com").await;

  let mut profile = Profile::new(owner.user_id);
  profile.apply(fields("Student"));
  s.save_profile(profile.clone()).await.unwrap();

  let experience = Experience::try_from(ExperienceInput {
    title:   Some("Engineer".into()),
    company: Some("Analytical Engines Ltd".into()),
    from:    Some("1843-01-01".into()),
    ..Default::default()
  })
  .unwrap();
  profile.apply(fields("Engineer"));
  profile.add_experience(experience.clone());
  s.save_profile(profile).await.unwrap();

  let fetched = s.get_profile(owner.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.status.as_deref(), Some("Engineer"));
  assert_eq!(fetched.experience, [experience]);
  assert_eq!(s.list_profile_views().await.unwrap().len(), 1);
}

#[tokio::test]
async fn save_profile_for_unknown_user_fails() {
  let s = store().await;
  let ghost = Uuid::new_v4();
  let err = s.save_profile(Profile::new(ghost)).await.unwrap_err();
  assert!(matches!(err, Error::UserNotFound(id) if id == ghost));
}

#[tokio::test]
async fn profile_view_embeds_owner() {
  let s = store().await;
  let owner = user(&s, "ada@example.com").await;
  s.save_profile(Profile::new(owner.user_id)).await.unwrap();

  let view = s.get_profile_view(owner.user_id).await.unwrap().unwrap();
  assert_eq!(view.user.id, owner.user_id);
  assert_eq!(view.user.name, "Ada Lovelace");
  assert_eq!(view.user.avatar, owner.avatar);
}

#[tokio::test]
async fn list_profiles_empty_and_populated() {
  let s = store().await;
  assert!(s.list_profile_views().await.unwrap().is_empty());

  let a = user(&s, "a@example.com").await;
  let b = user(&s, "b@example.com").await;
  user(&s, "no-profile@example.com").await;
  s.save_profile(Profile::new(a.user_id)).await.unwrap();
  s.save_profile(Profile::new(b.user_id)).await.unwrap();

  let views = s.list_profile_views().await.unwrap();
  let owners: Vec<_> = views.iter().map(|v| v.user.id).collect();
  assert_eq!(owners, [a.user_id, b.user_id]);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_account_removes_profile_and_user() {
  let s = store().await;
  let owner = user(&s, "ada@example.com").await;
  s.save_profile(Profile::new(owner.user_id)).await.unwrap();

  s.delete_account(owner.user_id).await.unwrap();

  assert!(s.get_profile(owner.user_id).await.unwrap().is_none());
  assert!(s.get_user(owner.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_account_is_idempotent() {
  let s = store().await;
  let owner = user(&s, "ada@example.com").await;

  // No profile yet, then nothing at all.
  s.delete_account(owner.user_id).await.unwrap();
  s.delete_account(owner.user_id).await.unwrap();
  s.delete_account(Uuid::new_v4()).await.unwrap();
}
