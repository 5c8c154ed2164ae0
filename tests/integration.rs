// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end flow tests against a local mock portal

use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mustekala::{
    confirm_downstream_access, ArtifactKind, ArtifactSource, Authenticator, Confidence,
    Credentials, Error, ExportRequest, FormsAuthenticator, ReportExporter, Session,
};

const LOGIN_PAGE: &str = r#"
<html><body>
<form action="login.aspx" method="post">
    <input type="hidden" name="__VIEWSTATE" value="dDwtMTI3fjM7">
    <input type="hidden" name="__VIEWSTATEGENERATOR" value="CA0B0334">
    <input type="hidden" name="__EVENTVALIDATION" value="/wEWAgL">
    <input type="text" id="txtUser" name="txtUser" placeholder="Usuário">
    <input type="password" id="txtSenha" name="txtSenha" placeholder="Senha">
    <input type="submit" name="btnEntrar" value="Entrar">
</form>
</body></html>
"#;

const REPORT_PAGE: &str = r#"
<html><body>
<form action="prod.aspx" method="post">
    <input type="hidden" name="__VIEWSTATE" value="dDwxOTk7">
    <input type="hidden" name="__EVENTVALIDATION" value="/wEWBQK">
    <select name="ddlMes"></select>
    <select name="ddlAno"></select>
    <input type="submit" name="btnExportar" value="Exportar CSV">
</form>
</body></html>
"#;

const POSTBACK_REPORT_PAGE: &str = r#"
<html><body>
<form action="prod.aspx" method="post">
    <input type="hidden" name="__VIEWSTATE" value="dDwxOTk7">
    <a id="lnkExportPdf" href="javascript:__doPostBack('lnkExportPdf','')">Export</a>
</form>
</body></html>
"#;

async fn login_page_mock(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_PAGE)
                .insert_header("content-type", "text/html; charset=utf-8")
                .insert_header("set-cookie", "ASP.NET_SessionId=abc123; Path=/; HttpOnly"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_replays_state_and_cookies() {
    let server = MockServer::start().await;
    login_page_mock(&server).await;

    // The submission must carry the hidden state verbatim, the resolved
    // credential fields, the submit pair, and the session cookie.
    Mock::given(method("POST"))
        .and(path("/login.aspx"))
        .and(header("cookie", "ASP.NET_SessionId=abc123"))
        .and(body_string_contains("__VIEWSTATE=dDwtMTI3fjM7"))
        .and(body_string_contains("__EVENTVALIDATION=%2FwEWAgL"))
        .and(body_string_contains("txtUser=joao"))
        .and(body_string_contains("txtSenha=s3cret"))
        .and(body_string_contains("btnEntrar=Entrar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><a href="logoff.aspx">Logoff</a></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let login_url = Url::parse(&format!("{}/login.aspx", server.uri())).unwrap();
    let outcome = FormsAuthenticator::new(login_url)
        .authenticate(&session, &Credentials::new("joao", "s3cret"))
        .await
        .unwrap();

    assert!(outcome.authenticated);
    assert_eq!(
        outcome.confidence,
        Some(Confidence::Positive {
            signal: "logoff".to_string()
        })
    );
    assert!(!session.cookie_jar().is_empty());
}

#[tokio::test]
async fn login_rejected_by_server() {
    let server = MockServer::start().await;
    login_page_mock(&server).await;

    Mock::given(method("POST"))
        .and(path("/login.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<span class="erro">Senha inválida</span>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let login_url = Url::parse(&format!("{}/login.aspx", server.uri())).unwrap();
    let outcome = FormsAuthenticator::new(login_url)
        .authenticate(&session, &Credentials::new("joao", "wrong"))
        .await
        .unwrap();

    assert!(!outcome.authenticated);
    assert_eq!(outcome.reason.as_deref(), Some("login rejected by server"));
    assert!(outcome.response_excerpt.contains("Senha inválida"));
}

#[tokio::test]
async fn login_without_password_input_is_resolution_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<form><input type="text" name="txtUser"></form>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let login_url = Url::parse(&format!("{}/login.aspx", server.uri())).unwrap();
    let err = FormsAuthenticator::new(login_url)
        .authenticate(&session, &Credentials::new("joao", "s3cret"))
        .await
        .unwrap_err();

    assert!(err.is_resolution());
    assert!(err.to_string().contains("password"));
}

#[tokio::test]
async fn export_direct_pdf_persisted_byte_for_byte() {
    let server = MockServer::start().await;
    let pdf_bytes: &[u8] = b"%PDF-1.7 fake report body";

    Mock::given(method("GET"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REPORT_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reports/prod.aspx"))
        .and(body_string_contains("__VIEWSTATE=dDwxOTk7"))
        .and(body_string_contains("ddlMes=05"))
        .and(body_string_contains("ddlAno=2024"))
        .and(body_string_contains("btnExportar=Exportar+CSV"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(pdf_bytes, "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let request =
        ExportRequest::new(Url::parse(&format!("{}/reports/prod.aspx", server.uri())).unwrap())
            .param("ddlMes", "05")
            .param("ddlAno", "2024");
    let artifact = ReportExporter::new()
        .fetch_export(&session, &request)
        .await
        .unwrap();

    assert_eq!(artifact.kind, ArtifactKind::Pdf);
    assert_eq!(artifact.source, ArtifactSource::DirectResponse);
    assert_eq!(&artifact.bytes[..], pdf_bytes);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.pdf");
    artifact.write_to(&out).await.unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), pdf_bytes);
}

#[tokio::test]
async fn export_follows_anchor_in_html_response() {
    let server = MockServer::start().await;
    let csv_bytes: &[u8] = b"mes;valor\n05;123,45\n";

    Mock::given(method("GET"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REPORT_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><a href="relatorio.csv">Baixar</a></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reports/relatorio.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(csv_bytes, "text/csv"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let request =
        ExportRequest::new(Url::parse(&format!("{}/reports/prod.aspx", server.uri())).unwrap());
    let artifact = ReportExporter::new()
        .fetch_export(&session, &request)
        .await
        .unwrap();

    assert_eq!(artifact.kind, ArtifactKind::Csv);
    assert_eq!(
        artifact.source,
        ArtifactSource::FollowedAnchor {
            href: "relatorio.csv".to_string()
        }
    );
    assert_eq!(&artifact.bytes[..], csv_bytes);
}

#[tokio::test]
async fn export_uses_synthetic_postback_for_unnamed_control() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(POSTBACK_REPORT_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reports/prod.aspx"))
        .and(body_string_contains("__EVENTTARGET=lnkExportPdf"))
        .and(body_string_contains("__EVENTARGUMENT="))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 x".as_slice(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let request =
        ExportRequest::new(Url::parse(&format!("{}/reports/prod.aspx", server.uri())).unwrap());
    let artifact = ReportExporter::new()
        .fetch_export(&session, &request)
        .await
        .unwrap();

    assert_eq!(artifact.kind, ArtifactKind::Pdf);
}

#[tokio::test]
async fn export_with_no_artifact_reports_excerpt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REPORT_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reports/prod.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><p>Nenhum registro encontrado</p></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    let request =
        ExportRequest::new(Url::parse(&format!("{}/reports/prod.aspx", server.uri())).unwrap());
    let err = ReportExporter::new()
        .fetch_export(&session, &request)
        .await
        .unwrap_err();

    match err {
        Error::ArtifactNotFound { excerpt } => {
            assert!(excerpt.contains("Nenhum registro"));
        }
        other => panic!("expected ArtifactNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn downstream_access_classification() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/home.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><h1>Painel de indicadores</h1></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/locked.aspx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<form><input type="password" name="senha"></form>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let session = Session::new().unwrap();

    let home = Url::parse(&format!("{}/home.aspx", server.uri())).unwrap();
    assert!(confirm_downstream_access(&session, &home).await.unwrap());

    let locked = Url::parse(&format!("{}/locked.aspx", server.uri())).unwrap();
    assert!(!confirm_downstream_access(&session, &locked).await.unwrap());
}
