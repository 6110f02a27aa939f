use serde_json::{json, Value};
use shared::{
    domain::{LinkId, LinkType, PostId, VoteDirection},
    protocol::CreateRelatedLinkRequest,
};
use tracing::info;

use crate::{
    links::{is_link_on_host, normalize_url},
    ActionContext, ActionError, ActionOutcome, ActionResult, ApiResponse, HttpMethod, Rejection,
};

const RELATED_LINKS: &str = "related-links";

impl ActionContext {
    /// Submits a link for a post. Episode links must point at the configured
    /// episode host; anything else is rejected without a request.
    pub async fn create_related_link(
        &self,
        url: &str,
        post_id: &PostId,
        link_type: LinkType,
    ) -> ActionResult<ApiResponse> {
        let url = normalize_url(url);

        if link_type == LinkType::Episode && !is_link_on_host(&url, &self.options.episode_host) {
            return Ok(self.reject(
                "relatedLinksCreate",
                Rejection::NotEpisodeLink {
                    host: self.options.episode_host.clone(),
                },
            ));
        }

        self.record(RELATED_LINKS, "relatedLinksCreate", format!("url: {url}"));
        let body = CreateRelatedLinkRequest { url, link_type };
        let response = self
            .send(
                HttpMethod::Post,
                &format!("/posts/{post_id}/related-link"),
                Some(&body),
            )
            .await?;
        Ok(ActionOutcome::Completed(response))
    }

    pub async fn remove_related_link(&self, id: Option<&LinkId>) -> ActionResult<ApiResponse> {
        if !self.auth.is_logged_in() {
            return Ok(self.reject("removeRelatedLink", Rejection::LoginRequiredToRemove));
        }

        let Some(id) = id.filter(|id| !id.as_str().is_empty()) else {
            return Ok(self.reject("removeRelatedLink", Rejection::MissingLinkId));
        };

        self.record(RELATED_LINKS, "removeRelatedLink", format!("id: {id}"));
        let response = self
            .send(
                HttpMethod::Delete,
                &format!("/related-links/{id}"),
                None::<&()>,
            )
            .await?;
        Ok(ActionOutcome::Completed(response))
    }

    pub async fn upvote_related_link(
        &self,
        id: &LinkId,
        post_id: &PostId,
    ) -> ActionResult<ApiResponse> {
        self.vote(id, post_id, VoteDirection::Up).await
    }

    pub async fn downvote_related_link(
        &self,
        id: &LinkId,
        post_id: &PostId,
    ) -> ActionResult<ApiResponse> {
        self.vote(id, post_id, VoteDirection::Down).await
    }

    /// Loads the links of a post into the store and returns them exactly as
    /// the server sent them. The body must be a JSON array.
    pub async fn fetch_related_links(&self, post_id: &PostId) -> ActionResult<Vec<Value>> {
        let path = format!("/posts/{post_id}/related-links");
        let response = self.send(HttpMethod::Get, &path, None::<&()>).await?;
        let links: Vec<Value> = serde_json::from_value(response.body)
            .map_err(|source| ActionError::Json { path, source })?;

        info!(post_id = %post_id, count = links.len(), "related-links: fetched");
        self.links.set_related_links(post_id, &links);
        Ok(ActionOutcome::Completed(links))
    }

    // The local update goes first and is kept even if the request fails.
    async fn vote(
        &self,
        id: &LinkId,
        post_id: &PostId,
        direction: VoteDirection,
    ) -> ActionResult<ApiResponse> {
        let action = match direction {
            VoteDirection::Up => "upvoteRelatedLink",
            VoteDirection::Down => "downvoteRelatedLink",
        };

        if !self.auth.is_logged_in() {
            return Ok(self.reject(action, Rejection::LoginRequiredToVote));
        }

        let _lane = self.votes.acquire(id).await;

        self.links.apply_vote(id, post_id, direction);
        self.record(RELATED_LINKS, action, format!("id: {id}"));

        let response = match direction {
            VoteDirection::Up => {
                self.send(
                    HttpMethod::Post,
                    &format!("/related-links/{id}/upvote"),
                    Some(&json!({})),
                )
                .await?
            }
            VoteDirection::Down => {
                self.send(
                    HttpMethod::Post,
                    &format!("/related-links/{id}/downvote"),
                    None::<&()>,
                )
                .await?
            }
        };
        Ok(ActionOutcome::Completed(response))
    }
}

#[cfg(test)]
#[path = "tests/related_links_tests.rs"]
mod tests;
