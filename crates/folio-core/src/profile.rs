//! The profile aggregate and its update rules.
//!
//! A profile is stored as one document, so every mutation here operates on a
//! whole [`Profile`] value that the caller then writes back in one step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  user::UserSummary,
  validate::{Checks, non_empty},
};

// ─── Sub-documents ───────────────────────────────────────────────────────────

/// Links to the owner's social accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub youtube:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin:  Option<String>,
}

/// A job held by the profile owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub id:          Uuid,
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

/// A course of study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub id:           Uuid,
  pub school:       String,
  pub degree:       String,
  pub fieldofstudy: String,
  pub from:         NaiveDate,
  pub to:           Option<NaiveDate>,
  pub status:       Option<String>,
  pub description:  Option<String>,
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:     Uuid,
  /// Owning user; at most one profile exists per user.
  pub user_id:        Uuid,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         Option<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  #[serde(default)]
  pub skills:         Vec<String>,
  #[serde(default)]
  pub social:         Social,
  /// Most recent first.
  #[serde(default)]
  pub experience:     Vec<Experience>,
  /// Most recent first.
  #[serde(default)]
  pub education:      Vec<Education>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Profile {
  /// An empty profile for `user_id`.
  pub fn new(user_id: Uuid) -> Self {
    let now = Utc::now();
    Self {
      profile_id: Uuid::new_v4(),
      user_id,
      company: None,
      website: None,
      location: None,
      status: None,
      bio: None,
      githubusername: None,
      skills: Vec::new(),
      social: Social::default(),
      experience: Vec::new(),
      education: Vec::new(),
      created_at: now,
      updated_at: now,
    }
  }

  /// Merge `fields` into this profile.
  ///
  /// Scalars and skills absent from the field-set keep their stored values.
  /// `social` is always replaced wholesale; see [`ProfileFields`].
  pub fn apply(&mut self, fields: ProfileFields) {
    merge(&mut self.company, fields.company);
    merge(&mut self.website, fields.website);
    merge(&mut self.location, fields.location);
    merge(&mut self.status, fields.status);
    merge(&mut self.bio, fields.bio);
    merge(&mut self.githubusername, fields.githubusername);
    if let Some(skills) = fields.skills {
      self.skills = skills;
    }
    self.social = fields.social;
    self.touch();
  }

  /// Prepend a new experience entry.
  pub fn add_experience(&mut self, entry: Experience) {
    self.experience.insert(0, entry);
    self.touch();
  }

  /// Remove the experience entry with `id`, keeping the order of the rest.
  pub fn remove_experience(&mut self, id: Uuid) -> Result<Experience> {
    let idx = self
      .experience
      .iter()
      .position(|e| e.id == id)
      .ok_or(Error::ExperienceNotFound(id))?;
    self.touch();
    Ok(self.experience.remove(idx))
  }

  /// Prepend a new education entry.
  pub fn add_education(&mut self, entry: Education) {
    self.education.insert(0, entry);
    self.touch();
  }

  /// Remove the education entry with `id`, keeping the order of the rest.
  pub fn remove_education(&mut self, id: Uuid) -> Result<Education> {
    let idx = self
      .education
      .iter()
      .position(|e| e.id == id)
      .ok_or(Error::EducationNotFound(id))?;
    self.touch();
    Ok(self.education.remove(idx))
  }

  fn touch(&mut self) { self.updated_at = Utc::now(); }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
  if value.is_some() {
    *slot = value;
  }
}

/// A profile joined with the public part of its owner.
///
/// Serializes as the flattened profile plus a `user` object, so the owner id
/// appears both as top-level `user_id` and as `user.id`. Clients that store
/// a bare profile keep working with `user_id`; `user` is the embedded owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
  #[serde(flatten)]
  pub profile: Profile,
  pub user:    UserSummary,
}

// ─── Update payloads ─────────────────────────────────────────────────────────

/// Raw body of a profile create/update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         Option<String>,
  /// Comma-separated, e.g. `"rust, go, sql"`.
  pub skills:         Option<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  pub youtube:        Option<String>,
  pub facebook:       Option<String>,
  pub twitter:        Option<String>,
  pub instagram:      Option<String>,
  pub linkedin:       Option<String>,
}

/// The validated field-set applied by [`Profile::apply`].
///
/// `None` means "leave as stored". `social` has no such escape: it is rebuilt
/// from the request alone, so links not resent on an update are dropped. This
/// keeps the social block an exact mirror of the last submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         Option<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  pub skills:         Option<Vec<String>>,
  pub social:         Social,
}

impl TryFrom<ProfileInput> for ProfileFields {
  type Error = Error;

  fn try_from(input: ProfileInput) -> Result<Self> {
    let mut checks = Checks::new();
    let status = checks.required("status", input.status, "Status is required");
    let skills = checks.required("skills", input.skills, "Skills is required");

    checks.finish(|| {
      Some(ProfileFields {
        company:        non_empty(input.company),
        website:        non_empty(input.website),
        location:       non_empty(input.location),
        status,
        bio:            non_empty(input.bio),
        githubusername: non_empty(input.githubusername),
        skills:         skills.as_deref().map(parse_skills),
        social:         Social {
          youtube:   non_empty(input.youtube),
          facebook:  non_empty(input.facebook),
          twitter:   non_empty(input.twitter),
          instagram: non_empty(input.instagram),
          linkedin:  non_empty(input.linkedin),
        },
      })
    })
  }
}

/// Split a comma-delimited skill list, trimming each element.
///
/// Empty elements are kept: `"a,b,"` yields `["a", "b", ""]`.
pub fn parse_skills(raw: &str) -> Vec<String> {
  raw.split(',').map(|s| s.trim().to_owned()).collect()
}

/// Raw body of `PUT /profile/experience`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceInput {
  pub title:       Option<String>,
  pub company:     Option<String>,
  pub location:    Option<String>,
  pub from:        Option<String>,
  pub to:          Option<String>,
  pub current:     Option<bool>,
  pub description: Option<String>,
}

impl TryFrom<ExperienceInput> for Experience {
  type Error = Error;

  fn try_from(input: ExperienceInput) -> Result<Self> {
    let mut checks = Checks::new();
    let title = checks.required("title", input.title, "title is required");
    let company = checks.required("company", input.company, "company is required");
    let from = checks.required_date("from", input.from, "from date is required");
    let to = checks.optional_date("to", input.to);

    checks.finish(|| {
      Some(Experience {
        id: Uuid::new_v4(),
        title: title?,
        company: company?,
        location: non_empty(input.location),
        from: from?,
        to,
        current: input.current.unwrap_or(false),
        description: non_empty(input.description),
      })
    })
  }
}

/// Raw body of `PUT /profile/education`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationInput {
  pub school:       Option<String>,
  pub degree:       Option<String>,
  pub fieldofstudy: Option<String>,
  pub from:         Option<String>,
  pub to:           Option<String>,
  pub status:       Option<String>,
  pub description:  Option<String>,
}

impl TryFrom<EducationInput> for Education {
  type Error = Error;

  fn try_from(input: EducationInput) -> Result<Self> {
    let mut checks = Checks::new();
    let school = checks.required("school", input.school, "School is required");
    let degree = checks.required("degree", input.degree, "degree is required");
    let fieldofstudy = checks.required(
      "fieldofstudy",
      input.fieldofstudy,
      "fieldofstudy is required",
    );
    let from = checks.required_date("from", input.from, "from is required");
    let to = checks.optional_date("to", input.to);

    checks.finish(|| {
      Some(Education {
        id: Uuid::new_v4(),
        school: school?,
        degree: degree?,
        fieldofstudy: fieldofstudy?,
        from: from?,
        to,
        status: non_empty(input.status),
        description: non_empty(input.description),
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields(status: &str, skills: &str) -> ProfileInput {
    ProfileInput {
      status: Some(status.into()),
      skills: Some(skills.into()),
      ..Default::default()
    }
  }

  fn experience(title: &str) -> Experience {
    Experience::try_from(ExperienceInput {
      title:   Some(title.into()),
      company: Some("Acme".into()),
      from:    Some("2020-01-01".into()),
      ..Default::default()
    })
    .unwrap()
  }

  fn education(school: &str) -> Education {
    Education::try_from(EducationInput {
      school:       Some(school.into()),
      degree:       Some("BSc".into()),
      fieldofstudy: Some("CS".into()),
      from:         Some("2012-09-01".into()),
      ..Default::default()
    })
    .unwrap()
  }

  // ── Skills ────────────────────────────────────────────────────────────────

  #[test]
  fn skills_are_split_and_trimmed() {
    assert_eq!(parse_skills("js, node , go"), ["js", "node", "go"]);
  }

  #[test]
  fn trailing_comma_keeps_empty_skill() {
    assert_eq!(parse_skills("a,b,"), ["a", "b", ""]);
  }

  // ── Field-set construction ────────────────────────────────────────────────

  #[test]
  fn status_and_skills_are_required() {
    let err = ProfileFields::try_from(ProfileInput::default()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation error") };
    let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
    assert_eq!(params, ["status", "skills"]);
  }

  #[test]
  fn empty_strings_are_omitted_from_field_set() {
    let mut input = fields("Developer", "rust");
    input.company = Some(String::new());
    input.twitter = Some(String::new());
    let f = ProfileFields::try_from(input).unwrap();
    assert_eq!(f.company, None);
    assert_eq!(f.social, Social::default());
  }

  // ── Merge ─────────────────────────────────────────────────────────────────

  #[test]
  fn update_is_a_partial_merge() {
    let mut profile = Profile::new(Uuid::new_v4());
    let mut first = fields("Developer", "rust");
    first.company = Some("A".into());
    profile.apply(ProfileFields::try_from(first).unwrap());

    let mut second = fields("Developer", "rust");
    second.location = Some("Berlin".into());
    profile.apply(ProfileFields::try_from(second).unwrap());

    assert_eq!(profile.company.as_deref(), Some("A"));
    assert_eq!(profile.location.as_deref(), Some("Berlin"));
  }

  #[test]
  fn social_is_replaced_not_merged() {
    let mut profile = Profile::new(Uuid::new_v4());
    let mut first = fields("Developer", "rust");
    first.twitter = Some("https://twitter.com/ada".into());
    first.youtube = Some("https://youtube.com/ada".into());
    profile.apply(ProfileFields::try_from(first).unwrap());

    let mut second = fields("Developer", "rust");
    second.linkedin = Some("https://linkedin.com/in/ada".into());
    profile.apply(ProfileFields::try_from(second).unwrap());

    assert_eq!(profile.social, Social {
      linkedin: Some("https://linkedin.com/in/ada".into()),
      ..Default::default()
    });
  }

  #[test]
  fn merge_does_not_touch_lists() {
    let mut profile = Profile::new(Uuid::new_v4());
    profile.add_experience(experience("Engineer"));
    profile.apply(ProfileFields::try_from(fields("Lead", "rust")).unwrap());
    assert_eq!(profile.experience.len(), 1);
  }

  // ── Experience ────────────────────────────────────────────────────────────

  #[test]
  fn experience_is_prepended() {
    let mut profile = Profile::new(Uuid::new_v4());
    let e1 = experience("E1");
    let e2 = experience("E2");
    profile.add_experience(e1.clone());
    profile.add_experience(e2.clone());
    assert_eq!(profile.experience, [e2, e1]);
  }

  #[test]
  fn remove_experience_preserves_order() {
    let mut profile = Profile::new(Uuid::new_v4());
    let (a, b, c) = (experience("A"), experience("B"), experience("C"));
    for e in [&a, &b, &c] {
      profile.add_experience(e.clone());
    }
    let removed = profile.remove_experience(b.id).unwrap();
    assert_eq!(removed, b);
    assert_eq!(profile.experience, [c, a]);
  }

  #[test]
  fn removing_unknown_experience_is_an_error_and_no_op() {
    let mut profile = Profile::new(Uuid::new_v4());
    profile.add_experience(experience("A"));
    let before = profile.experience.clone();
    let missing = Uuid::new_v4();
    let err = profile.remove_experience(missing).unwrap_err();
    assert!(matches!(err, Error::ExperienceNotFound(id) if id == missing));
    assert_eq!(profile.experience, before);
  }

  #[test]
  fn experience_reports_every_missing_field() {
    let err = Experience::try_from(ExperienceInput::default()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation error") };
    let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
    assert_eq!(params, ["title", "company", "from"]);
  }

  #[test]
  fn experience_rejects_malformed_from_date() {
    let err = Experience::try_from(ExperienceInput {
      title:   Some("Engineer".into()),
      company: Some("Acme".into()),
      from:    Some("last spring".into()),
      ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, Error::Validation(ref e) if e[0].param == "from"));
  }

  // ── Education ─────────────────────────────────────────────────────────────

  #[test]
  fn education_is_prepended_and_removable() {
    let mut profile = Profile::new(Uuid::new_v4());
    let first = education("MIT");
    let second = education("ETH");
    profile.add_education(first.clone());
    profile.add_education(second.clone());
    assert_eq!(profile.education, [second.clone(), first.clone()]);

    profile.remove_education(second.id).unwrap();
    assert_eq!(profile.education, [first]);
    assert!(matches!(
      profile.remove_education(second.id),
      Err(Error::EducationNotFound(_))
    ));
  }

  #[test]
  fn education_reports_every_missing_field() {
    let err = Education::try_from(EducationInput::default()).unwrap_err();
    let Error::Validation(errors) = err else { panic!("expected validation error") };
    let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
    assert_eq!(params, ["school", "degree", "fieldofstudy", "from"]);
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  #[test]
  fn view_flattens_profile_with_owner() {
    let profile = Profile::new(Uuid::new_v4());
    let view = ProfileView {
      user:    UserSummary {
        id:     profile.user_id,
        name:   "Ada".into(),
        avatar: "https://example.com/a.png".into(),
      },
      profile,
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["user"]["name"], "Ada");
    assert_eq!(json["user_id"], json["user"]["id"]);
    assert!(json.get("profile_id").is_some());
    assert!(json.get("skills").unwrap().is_array());
  }
}
