use fireless::{Application, ApplicationOptions, HandlerResponse};
use lambda_runtime::Error;
use log::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let app: Application = Application::new(ApplicationOptions::default());

    app.create("render", |request, app| async move {
        info!("request: {:?}", request);

        let site = app.get_db("sites/123").await?;
        info!("site: {:?}", site);

        Ok(HandlerResponse::new().status(200).body("DONE!"))
    });

    let entry = app.handler("render").expect("render handler must be registered");

    entry.serve().await
}
