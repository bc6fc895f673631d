use crate::error::ClientError;
use crate::PlaygroundClient;

/// A picture a correspondent sent, identified by its playground code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub code: String,
}

/// A text conversation with the person who texted the keyword.
#[derive(Debug, Clone)]
pub struct Conversation {
    client: PlaygroundClient,
    code: String,
}

impl Conversation {
    pub(crate) fn new(client: PlaygroundClient, code: String) -> Self {
        Self { client, code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub async fn send_message(&self, message: &str) -> Result<(), ClientError> {
        self.client.send_message(&self.code, message, None).await
    }

    pub async fn send_picture(&self, picture_url: &str, message: &str) -> Result<(), ClientError> {
        self.client
            .send_message(&self.code, message, Some(picture_url))
            .await
    }

    /// Sends `prompt` and waits for any text reply.
    pub async fn get_string(&self, prompt: &str) -> Result<String, ClientError> {
        self.send_message(prompt).await?;
        self.client.get_message(&self.code, "string").await
    }

    /// Sends `prompt` and waits for a whole number; the playground re-prompts on bad input.
    pub async fn get_integer(&self, prompt: &str) -> Result<i64, ClientError> {
        self.send_message(prompt).await?;
        self.client.get_message(&self.code, "int").await
    }

    pub async fn get_floating_point(&self, prompt: &str) -> Result<f64, ClientError> {
        self.send_message(prompt).await?;
        self.client.get_message(&self.code, "float").await
    }

    /// Sends `prompt` and waits for a reply carrying a picture.
    pub async fn get_picture(&self, prompt: &str) -> Result<Picture, ClientError> {
        self.send_message(prompt).await?;
        let code = self.client.get_picture(&self.code).await?;
        Ok(Picture { code })
    }

    pub async fn add_moustache(&self, picture: &Picture, name: &str) -> Result<(), ClientError> {
        self.client
            .add_to_picture(&self.code, &picture.code, "moustache", name)
            .await
    }

    pub async fn add_glasses(&self, picture: &Picture, name: &str) -> Result<(), ClientError> {
        self.client
            .add_to_picture(&self.code, &picture.code, "glasses", name)
            .await
    }

    /// Renders the picture with its chosen overlays and returns the public URL.
    pub async fn render_picture(&self, picture: &Picture) -> Result<String, ClientError> {
        self.client.render_picture(&self.code, &picture.code).await
    }
}
