//! Translation between skiff's pod model and the orchestrator's wire types.
use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::{Container, EnvVar, Pod, PodSpec},
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use skiff_model::{ContainerTemplate, Env, Labels, PodHandle, PodTemplate, SessionPodSpec};

/// Session pod: one container running the browser image, server-generated name.
pub(crate) fn session_pod(spec: &SessionPodSpec) -> Pod {
    Pod {
        metadata: ObjectMeta {
            generate_name: Some(spec.generate_name.clone()),
            namespace: Some(spec.namespace.clone()),
            labels: labels_to_wire(&spec.labels),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: spec.container_name.clone(),
                image: Some(spec.image.as_str().to_string()),
                ..Default::default()
            }],
            restart_policy: Some(spec.restart_policy.as_str().to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Caller-supplied pod submitted under a fixed name.
pub(crate) fn template_pod(name: &str, namespace: &str, template: &PodTemplate) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: labels_to_wire(&template.labels),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: template.containers.iter().map(container).collect(),
            restart_policy: Some(template.restart_policy.as_str().to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn container(c: &ContainerTemplate) -> Container {
    Container {
        name: c.name.clone(),
        image: Some(c.image.clone()),
        command: c.command.clone(),
        args: (!c.args.is_empty()).then(|| c.args.clone()),
        env: env_to_wire(&c.env),
        ..Default::default()
    }
}

fn env_to_wire(env: &Env) -> Option<Vec<EnvVar>> {
    if env.is_empty() {
        return None;
    }
    let vars = env
        .resolved()
        .into_iter()
        .map(|kv| {
            let (name, value) = kv.into_parts();
            EnvVar {
                name,
                value: Some(value),
                ..Default::default()
            }
        })
        .collect();
    Some(vars)
}

fn labels_to_wire(labels: &Labels) -> Option<BTreeMap<String, String>> {
    (!labels.is_empty()).then(|| labels.clone().into())
}

/// Backend-agnostic view of a pod returned by the control plane.
pub(crate) fn handle(pod: Pod) -> PodHandle {
    let meta = pod.metadata;
    PodHandle {
        name: meta.name.unwrap_or_default(),
        namespace: meta.namespace.unwrap_or_default(),
        uid: meta.uid,
        labels: meta.labels.map(Labels::from).unwrap_or_default(),
        phase: pod.status.and_then(|s| s.phase),
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::PodStatus;
    use skiff_model::{LABEL_SESSION_ID, RestartPolicy};

    use super::*;

    #[test]
    fn session_pod_shape() {
        let spec = SessionPodSpec::build("req-1", "myimage:chrome_70").unwrap();
        let pod = session_pod(&spec);

        assert_eq!(pod.metadata.generate_name.as_deref(), Some("session-"));
        assert_eq!(pod.metadata.namespace.as_deref(), Some("default"));
        assert!(pod.metadata.name.is_none());
        assert!(pod.metadata.labels.is_none());

        let spec = pod.spec.unwrap();
        assert_eq!(spec.restart_policy.as_deref(), Some("Never"));
        assert_eq!(spec.containers.len(), 1);
        assert_eq!(spec.containers[0].name, "req-req-1-brow-chrome-ver-70-0");
        assert_eq!(spec.containers[0].image.as_deref(), Some("myimage:chrome_70"));
    }

    #[test]
    fn template_pod_resolves_env_and_keeps_labels() {
        let mut c = ContainerTemplate::new("browser", "selenium/chrome:120");
        c.env.push("LANG", "C");
        c.env.push("LANG", "en_US.UTF-8");
        c.args = vec!["--headless".into()];

        let mut labels = Labels::new();
        labels.insert("team", "qa");
        let template = PodTemplate {
            containers: vec![c],
            restart_policy: RestartPolicy::OnFailure,
            labels,
        };

        let pod = template_pod("grid-1", "browsers", &template);
        assert_eq!(pod.metadata.name.as_deref(), Some("grid-1"));
        assert_eq!(pod.metadata.namespace.as_deref(), Some("browsers"));
        assert_eq!(
            pod.metadata.labels.as_ref().and_then(|l| l.get("team")).map(String::as_str),
            Some("qa")
        );

        let spec = pod.spec.unwrap();
        assert_eq!(spec.restart_policy.as_deref(), Some("OnFailure"));
        let env = spec.containers[0].env.as_ref().unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env[0].value.as_deref(), Some("en_US.UTF-8"));
        assert_eq!(spec.containers[0].args.as_deref(), Some(&["--headless".to_string()][..]));
        assert!(spec.containers[0].command.is_none());
    }

    #[test]
    fn handle_reads_metadata_and_phase() {
        let mut wire = BTreeMap::new();
        wire.insert(LABEL_SESSION_ID.to_string(), "abc".to_string());
        let pod = Pod {
            metadata: ObjectMeta {
                name: Some("session-x1".into()),
                namespace: Some("default".into()),
                uid: Some("u-1".into()),
                labels: Some(wire),
                ..Default::default()
            },
            status: Some(PodStatus {
                phase: Some("Running".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let h = handle(pod);
        assert_eq!(h.name, "session-x1");
        assert_eq!(h.uid.as_deref(), Some("u-1"));
        assert_eq!(h.labels.get(LABEL_SESSION_ID), Some("abc"));
        assert_eq!(h.phase.as_deref(), Some("Running"));
    }
}
